//! Header builder: the base/prefix declarations and the document root's
//! invariant properties, in the fixed order the store's ingestion expects.

use crate::{Emitter, Term, DECISION_BASE, ELI_IRI, LEG_IRI, ONT_IRI};
use diavgeia_model::{is_present, present};

impl<'a> Emitter<'a> {
    pub(crate) fn write_prefixes(&mut self) {
        let d = self.decision();
        self.push(&format!(
            "@base <{DECISION_BASE}{}/{}/>.\n",
            d.iun, d.version
        ));
        self.push(&format!("@prefix ont: {ONT_IRI}.\n"));
        self.push(&format!("@prefix eli: {ELI_IRI}.\n"));
        self.push(&format!("@prefix leg: {LEG_IRI}.\n\n"));
    }

    /// The document root block: identity, institution, recipients, and the
    /// forward references to every body and auxiliary entity this record
    /// will (or should) define. Ends the block with the submission
    /// timestamp and publication date.
    pub(crate) fn write_general_info(&mut self) {
        let d = self.decision();
        let f = self.fields();

        self.push(&format!("<> a ont:{};\n", d.decision_type));
        self.triple("ont", "version", Term::Plain(&d.version), false);
        self.triple("ont", "iun", Term::Str(&d.iun), false);
        self.triple("eli", "title", Term::Str(crate::text(&f.title)), false);
        self.triple("ont", "has_private_data", Term::Bool(f.has_private_data), false);
        self.triple(
            "ont",
            "government_institution_name",
            Term::Str(crate::text(&f.government_institution_name)),
            false,
        );
        self.triple(
            "ont",
            "protocol_number",
            Term::Str(crate::text(&f.protocol_number)),
            false,
        );
        self.write_institution_optional_info();
        if let Some(call) = present(&f.decision_call) {
            self.triple("ont", "decision_call", Term::Str(call), false);
        }
        for category in &f.thematic_category {
            self.triple("ont", "thematic_category", Term::Plain(category), false);
        }
        for unit_id in &d.unit_ids {
            self.triple("ont", "unit_id", Term::Plain(unit_id), false);
        }
        self.triple("ont", "organization_id", Term::Plain(&d.organization_id), false);

        // Forward references to the narrative bodies.
        if is_present(&f.preconsideration) {
            self.triple("ont", "has_preconsideration", Term::Entity("Preconsideration"), false);
        }
        for (i, entry) in f.considerations.iter().enumerate() {
            if is_present(&entry.text) {
                let subject = format!("Consideration/{}", i + 1);
                self.triple("ont", "has_considered", Term::Entity(&subject), false);
            }
        }
        // Opinions have no decision entries; the loop simply emits nothing.
        for (i, entry) in f.decisions.iter().enumerate() {
            if is_present(&entry.text) {
                let subject = format!("Decision/{}", i + 1);
                self.triple("ont", "has_decided", Term::Entity(&subject), false);
            }
        }
        if is_present(&f.afterconsideration) {
            self.triple("ont", "has_afterdecision", Term::Entity("AfterDecision"), false);
        }

        // Recipients.
        for party in &f.internal_distr {
            if let Some(name) = present(&party.name) {
                self.triple("ont", "internal_distribution", Term::Str(name), false);
            }
        }
        for party in &f.recipient_for_share {
            if let Some(name) = present(&party.name) {
                self.triple("ont", "recipient_for_share", Term::Str(name), false);
            }
        }
        for party in &f.recipient {
            if let Some(name) = present(&party.name) {
                self.triple("ont", "recipient", Term::Str(name), false);
            }
        }

        // Signers and present parties reference their entity blocks by row
        // position, gated on the row's display text.
        for (i, signer) in f.signer.iter().enumerate() {
            if is_present(&signer.text) {
                let subject = format!("Signer/{}", i + 1);
                self.triple("ont", "signed_by", Term::Entity(&subject), false);
            }
        }
        for (i, party) in f.present.iter().enumerate() {
            if is_present(&party.text) {
                let subject = format!("Present/{}", i + 1);
                self.triple("ont", "has_present", Term::Entity(&subject), false);
            }
        }

        // One verification reference per group that has at least one
        // fully-filled signer slot. The reference uses the group's own
        // index field, while the entity block is numbered by position.
        for group in &f.verification {
            if !group.is_active() {
                continue;
            }
            if !group.qualifying_signers().is_empty() {
                let subject = format!("Verification/{}", crate::text(&group.index));
                self.triple("ont", "has_verified", Term::Entity(&subject), false);
            }
        }

        if !d.benchmark {
            self.write_special_properties();
        }

        let timestamp = self.now().timestamp_millis().to_string();
        self.triple("ont", "submission_timestamp", Term::Plain(&timestamp), false);
        let date = self.now().format("%Y-%m-%d").to_string();
        self.triple("eli", "date_publication", Term::Date(&date), true);
    }

    fn write_institution_optional_info(&mut self) {
        let f = self.fields();
        if let Some(v) = present(&f.government_institution_general_administration) {
            self.triple("ont", "government_institution_general_administration", Term::Str(v), false);
        }
        if let Some(v) = present(&f.government_institution_department) {
            self.triple("ont", "government_institution_department", Term::Str(v), false);
        }
        if let Some(v) = present(&f.government_institution_address) {
            self.triple("ont", "government_institution_address", Term::Str(v), false);
        }
        if let Some(v) = present(&f.government_institution_postalcode) {
            self.triple("ont", "government_institution_postalcode", Term::Plain(v), false);
        }
        if let Some(v) = present(&f.government_institution_phone) {
            self.triple("ont", "government_institution_phone", Term::Plain(v), false);
        }
        if let Some(v) = present(&f.government_institution_fax) {
            self.triple("ont", "government_institution_fax", Term::Plain(v), false);
        }
        if let Some(v) = present(&f.government_institution_website) {
            self.triple("ont", "government_institution_website", Term::Plain(v), false);
        }
        if let Some(v) = present(&f.government_institution_email) {
            self.triple("ont", "government_institution_email", Term::Plain(v), false);
        }
        if let Some(v) = present(&f.government_institution_information) {
            self.triple("ont", "government_institution_information", Term::Str(v), false);
        }
    }
}
