//! Body text builder: the narrative entities (preconsideration,
//! considerations, decisions, after-consideration) as separate subjects.
//!
//! Consideration and Decision subjects are numbered by the entry's own
//! `index` field (the header's forward references use row position; the two
//! match for well-formed submissions and diverge silently otherwise).

use crate::linking::{format_linking, has_legislation_linking};
use crate::{Emitter, Term};
use diavgeia_model::present;

impl<'a> Emitter<'a> {
    pub(crate) fn write_decision_body(&mut self) {
        let f = self.fields();

        if let Some(pre) = present(&f.preconsideration) {
            self.subject("PreConsideration", "PreConsideration");
            self.triple("ont", "has_text", Term::Str(pre), true);
        }

        for entry in &f.considerations {
            if let Some(text) = present(&entry.text) {
                let subject = format!("Consideration/{}", crate::text(&entry.index));
                self.subject(&subject, "Consideration");
                if has_legislation_linking(entry) {
                    let line = format_linking(entry);
                    self.push(&line);
                }
                self.triple("ont", "has_text", Term::Str(text), true);
            }
        }

        for entry in &f.decisions {
            if let Some(text) = present(&entry.text) {
                let subject = format!("Decision/{}", crate::text(&entry.index));
                self.subject(&subject, "Decision");
                if has_legislation_linking(entry) {
                    let line = format_linking(entry);
                    self.push(&line);
                }
                self.triple("ont", "has_text", Term::Str(text), true);
            }
        }

        if let Some(after) = present(&f.afterconsideration) {
            self.subject("AfterConsideration", "AfterConsideration");
            self.triple("ont", "has_text", Term::Str(after), true);
        }
    }
}
