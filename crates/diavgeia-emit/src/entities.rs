//! Auxiliary entity builder: the secondary subjects the header and rule
//! table reference. Signers and present parties first, then verification
//! chains, then the per-type expense/sponsor graph.
//!
//! Numbering conventions differ per branch and are preserved as the
//! submission format defines them: some `Sponsored/<n>` subjects are
//! numbered by row position, others by the row's explicit `index` field.
//! A forward reference and its block only resolve to the same local name
//! when the submission keeps the two in step.

use crate::{Emitter, Term};
use diavgeia_model::{is_present, present, DecisionType, Withholding, WithKaeSubExpense};
use std::collections::BTreeMap;

impl<'a> Emitter<'a> {
    pub(crate) fn write_rest_entities(&mut self) {
        self.write_signer_blocks();
        self.write_present_blocks();
        self.write_verification_blocks();
        self.write_expense_entities();
    }

    fn write_signer_blocks(&mut self) {
        let f = self.fields();
        for signer in &f.signer {
            if let Some(name) = present(&signer.name) {
                let subject = format!("Signer/{}", crate::text(&signer.index));
                self.subject(&subject, "Signer");
                self.triple("ont", "signer_name", Term::Str(name), false);
                self.triple("ont", "signer_job", Term::Str(crate::text(&signer.job)), true);
            }
        }
    }

    fn write_present_blocks(&mut self) {
        let f = self.fields();
        for party in &f.present {
            if let Some(name) = present(&party.name) {
                let subject = format!("Present/{}", crate::text(&party.index));
                self.subject(&subject, "Present");
                self.triple("ont", "present_name", Term::Str(name), false);
                self.triple("ont", "present_title", Term::Str(crate::text(&party.role)), true);
            }
        }
    }

    /// One `Verification/<position+1>` block per active group, with a
    /// `verified_by` reference per qualifying signer slot. Verifier numbers
    /// come from the document-global counter, so they never reset between
    /// groups.
    fn write_verification_blocks(&mut self) {
        let f = self.fields();
        for (position, group) in f.verification.iter().enumerate() {
            if !group.is_active() {
                continue;
            }
            let signers = group.qualifying_signers();
            let subject = format!("Verification/{}", position + 1);
            self.subject(&subject, "Verification");
            let mut allocated = Vec::with_capacity(signers.len());
            for _ in &signers {
                let n = self.next_verifier();
                let verifier = format!("Verifier/{n}");
                self.triple("ont", "verified_by", Term::Entity(&verifier), false);
                allocated.push(n);
            }
            self.triple("ont", "has_text", Term::Str(crate::text(&group.has_text)), true);
            for (signer, n) in signers.iter().zip(allocated) {
                let subject = format!("Verifier/{n}");
                self.subject(&subject, "Verifier");
                self.triple("ont", "verifier_job", Term::Str(&signer.job), false);
                self.triple("ont", "verifier_name", Term::Str(&signer.name), true);
            }
        }
    }

    fn write_expense_entities(&mut self) {
        match self.decision().decision_type {
            DecisionType::Award | DecisionType::Contract => self.write_single_expense_fanout(),
            DecisionType::CommisionWarrant => self.write_commision_warrant_expenses(),
            DecisionType::DeclarationSummary => self.write_declaration_summary_expense(),
            DecisionType::DonationGrant => self.write_donation_grant_expenses(),
            DecisionType::ExpenditureApproval => self.write_expenditure_approval_expenses(),
            DecisionType::GeneralSpecialSecretaryMonocraticBody => {
                self.write_secretary_expense()
            }
            DecisionType::OwnershipTransferOfAssets => self.write_ownership_transfer_expense(),
            DecisionType::Undertaking => self.write_undertaking_expenses(),
            DecisionType::WorkAssignmentSupplyServicesStudies => {
                self.write_work_assignment_expense()
            }
            DecisionType::PaymentFinalisation => self.write_payment_finalisation_expenses(),
            _ => {}
        }
    }

    /// Award and Contract: a single `Expense/1` carrying the document-level
    /// amount, fanning out to one `Sponsored` per row. The fan-out
    /// references are numbered by position, the blocks by explicit index.
    fn write_single_expense_fanout(&mut self) {
        let f = self.fields();
        if !(is_present(&f.expense_amount) && super::rules::first_expense_has_afm(&f.expense)) {
            return;
        }
        self.subject("Expense/1", "Expense");
        self.triple("ont", "expense_amount", Term::Plain(crate::text(&f.expense_amount)), false);
        for (i, expense) in f.expense.iter().enumerate() {
            if is_present(&expense.afm) {
                let sponsored = format!("Sponsored/{}", i + 1);
                self.triple("ont", "has_sponsored", Term::Entity(&sponsored), false);
            }
        }
        self.triple(
            "ont",
            "expense_amount_currency",
            Term::Str(crate::text(&f.expense_currency)),
            true,
        );

        for expense in &f.expense {
            if is_present(&expense.afm)
                && is_present(&expense.afm_type)
                && is_present(&expense.name)
                && is_present(&expense.index)
            {
                let subject = format!("Sponsored/{}", crate::text(&expense.index));
                self.subject(&subject, "Sponsored");
                self.triple("ont", "afm", Term::Plain(crate::text(&expense.afm)), false);
                self.triple("ont", "afm_type", Term::Str(crate::text(&expense.afm_type)), false);
                self.triple("ont", "name", Term::Str(crate::text(&expense.name)), true);
            }
        }
    }

    fn write_commision_warrant_expenses(&mut self) {
        let f = self.fields();
        for expense in &f.expense {
            if is_present(&expense.kae)
                && is_present(&expense.expense_amount)
                && is_present(&expense.expense_currency)
                && is_present(&expense.index)
            {
                let subject = format!("ExpenseWithKae/{}", crate::text(&expense.index));
                self.subject(&subject, "ExpenseWithKae");
                self.triple(
                    "ont",
                    "expense_amount",
                    Term::Plain(crate::text(&expense.expense_amount)),
                    false,
                );
                self.triple(
                    "ont",
                    "expense_amount_currency",
                    Term::Str(crate::text(&expense.expense_currency)),
                    false,
                );
                self.triple("ont", "kae", Term::Plain(crate::text(&expense.kae)), true);
            }
        }
    }

    fn write_declaration_summary_expense(&mut self) {
        let f = self.fields();
        if is_present(&f.expense_amount) && is_present(&f.expense_currency) {
            self.subject("Expense/1", "Expense");
            if let Some(cpv) = present(&f.cpv) {
                self.triple("ont", "cpv", Term::Plain(cpv), false);
            }
            self.triple(
                "ont",
                "expense_amount",
                Term::Plain(crate::text(&f.expense_amount)),
                false,
            );
            self.triple(
                "ont",
                "expense_amount_currency",
                Term::Str(crate::text(&f.expense_currency)),
                true,
            );
        }
    }

    /// DonationGrant emits one `Expense` block per row unconditionally (the
    /// submission format carries the amount per row here), each pointing at
    /// the shared `OrganizationSponsor/1`.
    fn write_donation_grant_expenses(&mut self) {
        let f = self.fields();
        for (i, expense) in f.expense.iter().enumerate() {
            let subject = format!("Expense/{}", i + 1);
            self.subject(&subject, "Expense");
            if is_present(&expense.afm)
                && is_present(&expense.afm_type)
                && is_present(&expense.expense_amount)
                && is_present(&expense.expense_currency)
            {
                let sponsored = format!("Sponsored/{}", i + 1);
                self.triple("ont", "has_sponsored", Term::Entity(&sponsored), false);
            }
            self.triple(
                "ont",
                "has_organization_sponsor",
                Term::Entity("OrganizationSponsor/1"),
                false,
            );
            self.triple(
                "ont",
                "expense_amount",
                Term::Plain(crate::text(&expense.expense_amount)),
                false,
            );
            self.triple(
                "ont",
                "expense_amount_currency",
                Term::Str(crate::text(&expense.expense_currency)),
                true,
            );
        }

        self.write_organization_sponsor_block();

        for (i, expense) in f.expense.iter().enumerate() {
            if is_present(&expense.afm)
                && is_present(&expense.afm_type)
                && is_present(&expense.sponsored)
                && is_present(&expense.index)
            {
                let subject = format!("Sponsored/{}", i + 1);
                self.subject(&subject, "Sponsored");
                self.triple("ont", "afm", Term::Plain(crate::text(&expense.afm)), false);
                self.triple("ont", "afm_type", Term::Str(crate::text(&expense.afm_type)), false);
                self.triple("ont", "name", Term::Str(crate::text(&expense.sponsored)), true);
            }
        }
    }

    fn write_expenditure_approval_expenses(&mut self) {
        let f = self.fields();
        for expense in &f.expense {
            if is_present(&expense.afm)
                && is_present(&expense.expense_amount)
                && is_present(&expense.expense_currency)
                && is_present(&expense.index)
                && is_present(&expense.sponsored)
            {
                let index = crate::text(&expense.index);
                let subject = format!("Expense/{index}");
                self.subject(&subject, "Expense");
                self.triple(
                    "ont",
                    "expense_amount",
                    Term::Plain(crate::text(&expense.expense_amount)),
                    false,
                );
                self.triple(
                    "ont",
                    "expense_amount_currency",
                    Term::Str(crate::text(&expense.expense_currency)),
                    false,
                );
                if let Some(kae) = present(&expense.kae) {
                    self.triple("ont", "kae", Term::Plain(kae), false);
                }
                if let Some(cpv) = present(&expense.cpv) {
                    self.triple("ont", "cpv", Term::Str(cpv), false);
                }
                let sponsored = format!("Sponsored/{index}");
                self.triple("ont", "has_sponsored", Term::Entity(&sponsored), false);
                self.triple(
                    "ont",
                    "has_organization_sponsor",
                    Term::Entity("OrganizationSponsor/1"),
                    true,
                );

                self.subject(&sponsored, "Sponsored");
                self.triple("ont", "afm", Term::Plain(crate::text(&expense.afm)), false);
                self.triple("ont", "afm_type", Term::Str(crate::text(&expense.afm_type)), false);
                self.triple("ont", "name", Term::Str(crate::text(&expense.sponsored)), true);
            }
        }
        self.write_organization_sponsor_block();
    }

    fn write_secretary_expense(&mut self) {
        let f = self.fields();
        if is_present(&f.expense_amount) && is_present(&f.expense_currency) {
            self.subject("Expense/1", "Expense");
            self.triple(
                "ont",
                "expense_amount",
                Term::Str(crate::text(&f.expense_amount)),
                false,
            );
            self.triple(
                "ont",
                "expense_amount_currency",
                Term::Str(crate::text(&f.expense_currency)),
                true,
            );
        }
    }

    fn write_ownership_transfer_expense(&mut self) {
        let f = self.fields();
        if !(super::rules::sponsor_fields_set(f)
            && super::rules::first_expense_identifies_sponsored(&f.expense)
            && is_present(&f.asset_name))
        {
            return;
        }
        self.subject("Expense/1", "Expense");
        for (i, expense) in f.expense.iter().enumerate() {
            if is_present(&expense.afm)
                && is_present(&expense.afm_type)
                && is_present(&expense.sponsored)
            {
                let sponsored = format!("Sponsored/{}", i + 1);
                self.triple("ont", "has_sponsored", Term::Entity(&sponsored), false);
            }
        }
        self.triple(
            "ont",
            "has_organization_sponsor",
            Term::Entity("OrganizationSponsor/1"),
            true,
        );

        self.write_organization_sponsor_block();

        for expense in &f.expense {
            if is_present(&expense.afm)
                && is_present(&expense.afm_type)
                && is_present(&expense.sponsored)
            {
                let subject = format!("Sponsored/{}", crate::text(&expense.index));
                self.subject(&subject, "Sponsored");
                self.triple("ont", "afm", Term::Plain(crate::text(&expense.afm)), false);
                self.triple("ont", "afm_type", Term::Str(crate::text(&expense.afm_type)), false);
                self.triple("ont", "name", Term::Str(crate::text(&expense.sponsored)), true);
            }
        }
    }

    fn write_undertaking_expenses(&mut self) {
        let f = self.fields();
        for (i, expense) in f.expense.iter().enumerate() {
            if is_present(&expense.kae)
                && is_present(&expense.expense_amount)
                && is_present(&expense.expense_currency)
                && is_present(&expense.kae_budget_remainder)
                && is_present(&expense.kae_credit_remainder)
                && is_present(&expense.index)
            {
                let subject = format!("ExpenseWithKae/{}", crate::text(&expense.index));
                self.subject(&subject, "ExpenseWithKae");
                self.triple(
                    "ont",
                    "expense_amount",
                    Term::Plain(crate::text(&expense.expense_amount)),
                    false,
                );
                self.triple(
                    "ont",
                    "expense_amount_currency",
                    Term::Str(crate::text(&expense.expense_currency)),
                    false,
                );
                self.triple("ont", "kae", Term::Plain(crate::text(&expense.kae)), false);
                self.triple(
                    "ont",
                    "kae_budget_remainder",
                    Term::Plain(crate::text(&expense.kae_budget_remainder)),
                    false,
                );
                if undertaking_row_sponsored(expense) {
                    let sponsored = format!("Sponsored/{}", i + 1);
                    self.triple("ont", "has_sponsored", Term::Entity(&sponsored), false);
                }
                self.triple(
                    "ont",
                    "kae_credit_remainder",
                    Term::Plain(crate::text(&expense.kae_credit_remainder)),
                    true,
                );
            }
            if undertaking_row_sponsored(expense) {
                let subject = format!("Sponsored/{}", i + 1);
                self.subject(&subject, "Sponsored");
                self.triple("ont", "afm", Term::Plain(crate::text(&expense.afm)), false);
                self.triple("ont", "afm_type", Term::Str(crate::text(&expense.afm_type)), false);
                self.triple("ont", "name", Term::Str(crate::text(&expense.sponsored)), true);
            }
        }
    }

    fn write_work_assignment_expense(&mut self) {
        let f = self.fields();
        if !super::rules::work_assignment_expense_gate(f) {
            return;
        }
        self.subject("Expense/1", "Expense");
        // Every row shares the document-level CPV.
        if let Some(cpv) = present(&f.cpv) {
            self.triple("ont", "cpv", Term::Plain(cpv), false);
        }
        for (i, expense) in f.expense.iter().enumerate() {
            if work_assignment_row_qualifies(expense) {
                let sponsored = format!("Sponsored/{}", i + 1);
                self.triple("ont", "has_sponsored", Term::Entity(&sponsored), false);
            }
        }
        self.triple("ont", "expense_amount", Term::Plain(crate::text(&f.expense_amount)), false);
        self.triple(
            "ont",
            "expense_amount_currency",
            Term::Str(crate::text(&f.expense_currency)),
            true,
        );
        for expense in &f.expense {
            if work_assignment_row_qualifies(expense) {
                let subject = format!("Sponsored/{}", crate::text(&expense.index));
                self.subject(&subject, "Sponsored");
                self.triple("ont", "afm", Term::Plain(crate::text(&expense.afm)), false);
                self.triple("ont", "afm_type", Term::Str(crate::text(&expense.afm_type)), false);
                self.triple("ont", "name", Term::Str(crate::text(&expense.sponsored)), true);
            }
        }
    }

    /// PaymentFinalisation: per-row expenses with nested withholding and
    /// KAE sub-expense entities collected while walking the rows. The two
    /// entity families are numbered by independent counters starting at 1.
    fn write_payment_finalisation_expenses(&mut self) {
        let f = self.fields();
        if !super::rules::organization_sponsor_set(f) {
            return;
        }
        let mut any_valid_expense = false;
        let mut withholdings: BTreeMap<u32, &Withholding> = BTreeMap::new();
        let mut sub_expenses: BTreeMap<u32, &WithKaeSubExpense> = BTreeMap::new();
        let mut next_withholding = 1u32;
        let mut next_sub_expense = 1u32;

        for (i, expense) in f.expense.iter().enumerate() {
            if !super::rules::payment_expense_gate(f, expense) {
                continue;
            }
            let subject = format!("Expense/{}", i + 1);
            self.subject(&subject, "Expense");
            self.triple(
                "ont",
                "expense_amount",
                Term::Plain(crate::text(&expense.expense_amount)),
                false,
            );
            self.triple(
                "ont",
                "expense_amount_currency",
                Term::Str(crate::text(&expense.expense_currency)),
                false,
            );
            if let Some(reason) = present(&expense.payment_reason) {
                self.triple("ont", "payment_reason", Term::Str(reason), false);
            }
            if let Some(cpv) = present(&expense.cpv) {
                self.triple("ont", "cpv", Term::Plain(cpv), false);
            }
            if is_present(&expense.payment_with_withholdings)
                && is_present(&expense.payment_with_withholdings_currency)
            {
                self.triple(
                    "ont",
                    "payment_with_withholdings",
                    Term::Plain(crate::text(&expense.payment_with_withholdings)),
                    false,
                );
                self.triple(
                    "ont",
                    "payment_with_withholdings_currency",
                    Term::Str(crate::text(&expense.payment_with_withholdings_currency)),
                    false,
                );
            }
            for document in &expense.document {
                self.triple("ont", "has_document", Term::Str(document), false);
            }
            for withholding in &expense.withholding {
                if is_present(&withholding.withholding_text)
                    && is_present(&withholding.withholding_expense)
                    && is_present(&withholding.withholding_expense_currency)
                {
                    let reference = format!("WithHolding/{next_withholding}");
                    self.triple("ont", "has_withHolding", Term::Entity(&reference), false);
                    withholdings.insert(next_withholding, withholding);
                    next_withholding += 1;
                }
            }
            for sub_expense in &expense.with_kae_sub_expense {
                if is_present(&sub_expense.kae)
                    && is_present(&sub_expense.expense_amount)
                    && is_present(&sub_expense.expense_amount_currency)
                {
                    let reference = format!("WithKaeSubExpense/{next_sub_expense}");
                    self.triple("ont", "has_withkaesubexpense", Term::Entity(&reference), false);
                    sub_expenses.insert(next_sub_expense, sub_expense);
                    next_sub_expense += 1;
                }
            }
            self.triple(
                "ont",
                "has_organization_sponsor",
                Term::Entity("OrganizationSponsor/1"),
                true,
            );
            if !is_present(&f.reason_multiple_afm_ignorance) {
                let sponsored = format!("Sponsored/{}", i + 1);
                self.subject(&sponsored, "Sponsored");
                self.triple("ont", "name", Term::Str(crate::text(&expense.name)), false);
                self.triple("ont", "afm", Term::Plain(crate::text(&expense.afm)), false);
                self.triple("ont", "afm_type", Term::Str(crate::text(&expense.afm_type)), true);
            }
            any_valid_expense = true;
        }

        if !any_valid_expense {
            return;
        }

        self.subject("OrganizationSponsor/1", "OrganizationSponsor");
        self.triple("ont", "afm", Term::Str(crate::text(&f.organization_sponsor_afm)), false);
        self.triple(
            "ont",
            "afm_type",
            Term::Str(crate::text(&f.organization_sponsor_afm_type)),
            false,
        );
        self.triple("ont", "name", Term::Str(crate::text(&f.organization_sponsor_name)), true);

        for (key, withholding) in withholdings {
            let subject = format!("WithHolding/{key}");
            self.subject(&subject, "WithHolding");
            self.triple(
                "ont",
                "withholding_text",
                Term::Str(crate::text(&withholding.withholding_text)),
                false,
            );
            self.triple(
                "ont",
                "withholding_expense",
                Term::Plain(crate::text(&withholding.withholding_expense)),
                false,
            );
            self.triple(
                "ont",
                "withholding_expense_currency",
                Term::Str(crate::text(&withholding.withholding_expense_currency)),
                true,
            );
        }

        for (key, sub_expense) in sub_expenses {
            let subject = format!("WithKaeSubExpense/{key}");
            self.subject(&subject, "WithKaeSubExpense");
            self.triple("ont", "kae", Term::Plain(crate::text(&sub_expense.kae)), false);
            self.triple(
                "ont",
                "expense_amount",
                Term::Plain(crate::text(&sub_expense.expense_amount)),
                false,
            );
            self.triple(
                "ont",
                "expense_amount_currency",
                Term::Str(crate::text(&sub_expense.expense_amount_currency)),
                true,
            );
        }
    }

    /// `OrganizationSponsor/1` from the document-level sponsor identity.
    /// The `afm` property is omitted when the organization has none.
    fn write_organization_sponsor_block(&mut self) {
        let f = self.fields();
        self.subject("OrganizationSponsor/1", "OrganizationSponsor");
        self.triple("ont", "afm_type", Term::Str(crate::text(&f.sponsor_afm_type)), false);
        if let Some(afm) = present(&f.sponsor_afm) {
            self.triple("ont", "afm", Term::Plain(afm), false);
        }
        self.triple("ont", "name", Term::Str(crate::text(&f.sponsor_name)), true);
    }
}

fn undertaking_row_sponsored(expense: &diavgeia_model::Expense) -> bool {
    is_present(&expense.afm) && is_present(&expense.afm_type) && is_present(&expense.sponsored)
}

fn work_assignment_row_qualifies(expense: &diavgeia_model::Expense) -> bool {
    is_present(&expense.afm)
        && is_present(&expense.sponsored)
        && is_present(&expense.index)
        && is_present(&expense.afm_type)
}
