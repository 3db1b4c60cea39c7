//! Type rule engine: the per-decision-type property rules emitted inside
//! the document root block.
//!
//! Exactly one branch runs per document. Each branch is a list of
//! independent (presence predicate, emission) rules; the predicates are the
//! exact conjunctions the submission format defines, including the
//! cross-field couplings that look odd but are load-bearing (for instance
//! the normative-type triple gates on the normative *number*). The forward
//! references emitted here (`has_expense`, `has_expense_with_kae`) must
//! line up with the entity blocks of the auxiliary builder; where the two
//! use different numbering conventions for the same entity, both sides are
//! kept as is.

use crate::{kallikratis, Emitter, Term, DECISION_BASE};
use diavgeia_model::{is_present, present, DecisionType, Expense};

/// `publish_via` value that routes OtherDecisions/OtherDevelopmentLaw
/// through the FEK properties.
const PUBLISH_VIA_FEK: &str = "Στο ΦΕΚ";
/// Contract kind that carries no co-funding or expense properties.
const CONTRACT_OPEN_ENDED: &str = "Σύμβαση Ιδιωτικού Δικαίου Αορίστου Χρόνου";
/// Contract kind that carries the expense reference and start/end dates.
const CONTRACT_FOR_WORK: &str = "Σύμβαση Έργου";

impl<'a> Emitter<'a> {
    pub(crate) fn write_special_properties(&mut self) {
        let f = self.fields();
        match self.decision().decision_type {
            DecisionType::Normative => {
                self.write_normative_type();
                if let Some(v) = present(&f.normative_number) {
                    self.triple("ont", "normative_number", Term::Plain(v), false);
                }
                self.write_fek();
            }
            DecisionType::Circular => {
                if let Some(v) = present(&f.circular_number) {
                    self.triple("ont", "circular_number", Term::Plain(v), false);
                }
            }
            DecisionType::Appointment => {
                if let Some(v) = present(&f.number_employees) {
                    self.triple("ont", "number_employees", Term::Integer(v), false);
                }
                if let Some(v) = present(&f.appointment_employer_org) {
                    self.triple("ont", "appointment_employer_org", Term::Plain(v), false);
                }
                self.write_fek();
            }
            DecisionType::Award => {
                if is_present(&f.expense_amount) && first_expense_has_afm(&f.expense) {
                    self.triple("ont", "has_expense", Term::Entity("Expense/1"), false);
                }
                if let Some(iun) = present(&f.has_related_declaration_summary) {
                    self.write_related_decision("has_related_declaration_summary", iun);
                }
            }
            DecisionType::LegislativeDecree => {
                if let Some(v) = present(&f.legislative_decree_number) {
                    self.triple("ont", "legislative_decree_number", Term::Plain(v), false);
                }
                self.write_fek();
            }
            DecisionType::OtherDecisions | DecisionType::OtherDevelopmentLaw => {
                self.write_normative_type();
                if let Some(v) = present(&f.publish_via) {
                    self.triple("ont", "publish_via", Term::Str(v), false);
                }
                if f.publish_via.as_deref() == Some(PUBLISH_VIA_FEK) {
                    self.write_fek();
                }
            }
            DecisionType::ServiceChange => {
                if let Some(v) = present(&f.service_change_decision_type) {
                    self.triple("ont", "service_change_decision_type", Term::Str(v), false);
                }
                self.write_fek();
            }
            DecisionType::OccupationInvitation => {
                if let Some(v) = present(&f.vacancy_opening_type) {
                    self.triple("ont", "vacancy_opening_type", Term::Str(v), false);
                }
                if let Some(iun) = present(&f.has_related_undertaking) {
                    self.write_related_decision("has_related_undertaking", iun);
                }
            }
            DecisionType::Records => {
                if let Some(v) = present(&f.record_subject) {
                    self.triple("ont", "record_subject", Term::Str(v), false);
                }
                if let Some(v) = present(&f.record_number) {
                    self.triple("ont", "record_number", Term::Plain(v), false);
                }
            }
            DecisionType::BalanceAccount => {
                if let Some(v) = present(&f.balance_account_type) {
                    self.triple("ont", "balance_account_type", Term::Str(v), false);
                }
                if let Some(v) = present(&f.balance_account_time_period) {
                    self.triple("ont", "balance_account_time_period", Term::Str(v), false);
                }
                if let Some(v) = present(&f.financial_year) {
                    self.triple("ont", "financial_year", Term::Plain(v), false);
                }
                self.write_org_approval_flag();
            }
            DecisionType::BudgetApproval => {
                if let Some(v) = present(&f.budget_type) {
                    self.triple("ont", "budget_type", Term::Str(v), false);
                }
                if let Some(v) = present(&f.budget_category) {
                    self.triple("ont", "budget_category", Term::Str(v), false);
                }
                if let Some(v) = present(&f.financial_year) {
                    self.triple("ont", "financial_year", Term::Plain(v), false);
                }
                self.write_org_approval_flag();
            }
            DecisionType::CollegialBodyCommisionWorkingGroup => {
                if let Some(v) = present(&f.collegial_body_party_type) {
                    self.triple("ont", "collegial_body_party_type", Term::Str(v), false);
                }
                if let Some(kind) = present(&f.collegial_body_decision_type) {
                    self.triple("ont", "collegial_body_decision_type", Term::Str(kind), false);
                    if is_present(&f.collegial_body_refund) && is_present(&f.expense_currency) {
                        self.triple(
                            "ont",
                            "collegial_body_refund",
                            Term::Plain(crate::text(&f.collegial_body_refund)),
                            false,
                        );
                        self.triple(
                            "ont",
                            "collegial_body_currency",
                            Term::Str(crate::text(&f.expense_currency)),
                            false,
                        );
                    }
                }
                self.write_fek();
            }
            DecisionType::CommisionWarrant => {
                for (i, expense) in f.expense.iter().enumerate() {
                    if is_present(&expense.kae)
                        && is_present(&expense.expense_amount)
                        && is_present(&expense.expense_currency)
                        && is_present(&expense.index)
                    {
                        let subject = format!("ExpenseWithKae/{}", i + 1);
                        self.triple("ont", "has_expense_with_kae", Term::Entity(&subject), false);
                    }
                }
                if let Some(v) = present(&f.primary_officer) {
                    self.triple("ont", "primary_officer", Term::Str(v), false);
                }
                if let Some(v) = present(&f.secondary_officer) {
                    self.triple("ont", "secondary_officer", Term::Str(v), false);
                }
                if let Some(v) = present(&f.budget_category) {
                    self.triple("ont", "budget_category", Term::Str(v), false);
                }
                if let Some(v) = present(&f.financial_year) {
                    self.triple("ont", "financial_year", Term::Plain(v), false);
                }
            }
            DecisionType::Contract => {
                if let Some(kind) = present(&f.contract_decision_type) {
                    self.triple("ont", "contract_decision_type", Term::Str(kind), false);
                    if let Some(v) = present(&f.number_employees) {
                        self.triple("ont", "number_employees", Term::Integer(v), false);
                    }
                    if kind != CONTRACT_OPEN_ENDED {
                        self.triple(
                            "ont",
                            "contract_is_co_funded",
                            Term::Bool(f.contract_is_co_funded),
                            false,
                        );
                        if kind == CONTRACT_FOR_WORK {
                            if is_present(&f.expense_amount) && first_expense_has_afm(&f.expense) {
                                self.triple("ont", "has_expense", Term::Entity("Expense/1"), false);
                            }
                            self.triple(
                                "ont",
                                "contract_start",
                                Term::Date(crate::text(&f.contract_start)),
                                false,
                            );
                            self.triple(
                                "ont",
                                "contract_end",
                                Term::Date(crate::text(&f.contract_end)),
                                false,
                            );
                        }
                    }
                }
            }
            DecisionType::DeclarationSummary => {
                if is_present(&f.expense_amount) && is_present(&f.expense_currency) {
                    self.triple("ont", "has_expense", Term::Entity("Expense/1"), false);
                }
                if let Some(v) = present(&f.tendering_procedure) {
                    self.triple("ont", "tendering_procedure", Term::Str(v), false);
                }
                if let Some(v) = present(&f.selection_criterion) {
                    self.triple("ont", "selection_criterion", Term::Str(v), false);
                }
                if let Some(v) = present(&f.contract_type) {
                    self.triple("ont", "contract_type", Term::Str(v), false);
                }
                if let Some(v) = present(&f.government_institution_budget_code) {
                    self.triple("ont", "government_institution_budget_code", Term::Str(v), false);
                }
            }
            DecisionType::DonationGrant => {
                if let Some(v) = present(&f.donation_type) {
                    self.triple("ont", "donation_type", Term::Str(v), false);
                }
                if let Some(v) = present(&f.kae) {
                    self.triple("ont", "kae", Term::Plain(v), false);
                }
                for (i, expense) in f.expense.iter().enumerate() {
                    if is_present(&expense.expense_amount)
                        && is_present(&expense.expense_currency)
                        && is_present(&f.sponsor_afm)
                        && is_present(&f.sponsor_name)
                    {
                        let subject = format!("Expense/{}", i + 1);
                        self.triple("ont", "has_expense", Term::Entity(&subject), false);
                    }
                }
            }
            DecisionType::SpatialPlanningDecisions => {
                if let Some(municipality) = present(&f.municipality) {
                    match kallikratis::municipality_iri(municipality) {
                        Some(iri) => {
                            self.triple("ont", "has_municipality", Term::Entity(iri), false)
                        }
                        None => tracing::debug!(municipality, "no kallikratis entry"),
                    }
                }
                if let Some(v) = present(&f.spatial_planning_decision_type) {
                    self.triple("ont", "spatial_planning_decision_type", Term::Str(v), false);
                }
            }
            DecisionType::ExpenditureApproval => {
                for (i, expense) in f.expense.iter().enumerate() {
                    if is_present(&expense.afm)
                        && is_present(&expense.expense_amount)
                        && is_present(&expense.expense_currency)
                        && is_present(&expense.index)
                        && is_present(&expense.sponsored)
                    {
                        let subject = format!("Expense/{}", i + 1);
                        self.triple("ont", "has_expense", Term::Entity(&subject), false);
                    }
                }
                if let Some(iun) = present(&f.has_related_undertaking) {
                    self.write_related_decision("has_related_undertaking", iun);
                }
            }
            DecisionType::GeneralSpecialSecretaryMonocraticBody => {
                if is_present(&f.expense_amount) && is_present(&f.expense_currency) {
                    self.triple("ont", "has_expense", Term::Entity("Expense/1"), false);
                }
                if let Some(v) = present(&f.position) {
                    self.triple("ont", "position", Term::Str(v), false);
                }
                if let Some(v) = present(&f.position_decision_type) {
                    self.triple("ont", "position_decision_type", Term::Str(v), false);
                }
                if let Some(v) = present(&f.position_org) {
                    self.triple("ont", "position_org", Term::Str(v), false);
                }
            }
            DecisionType::OwnershipTransferOfAssets => {
                if sponsor_fields_set(self.fields())
                    && first_expense_identifies_sponsored(&f.expense)
                    && is_present(&f.asset_name)
                {
                    self.triple("ont", "has_expense", Term::Entity("Expense/1"), false);
                    self.triple("ont", "asset_name", Term::Str(crate::text(&f.asset_name)), false);
                }
            }
            DecisionType::SuccessfulAppointedRunnerUpList => {
                if let Some(iun) = present(&f.has_related_occupation_invitation) {
                    self.write_related_decision("has_related_occupation_invitation", iun);
                }
            }
            DecisionType::Undertaking => {
                if let Some(v) = present(&f.financial_year) {
                    self.triple("ont", "financial_year", Term::Plain(v), false);
                }
                if let Some(v) = present(&f.budget_category) {
                    self.triple("ont", "budget_category", Term::Str(v), false);
                }
                if let Some(v) = present(&f.entry_number) {
                    self.triple("ont", "entry_number", Term::Plain(v), false);
                }
                self.triple("ont", "partialead", Term::Bool(f.partialead), false);
                self.triple("ont", "recalled_expense", Term::Bool(f.recalled_expense), false);
                for (i, expense) in f.expense.iter().enumerate() {
                    if is_present(&expense.afm)
                        && is_present(&expense.kae)
                        && is_present(&expense.expense_amount)
                        && is_present(&expense.expense_currency)
                        && is_present(&expense.kae_budget_remainder)
                        && is_present(&expense.kae_credit_remainder)
                        && is_present(&expense.index)
                        && is_present(&expense.afm_type)
                        && is_present(&expense.sponsored)
                    {
                        let subject = format!("ExpenseWithKae/{}", i + 1);
                        self.triple("ont", "has_expense_with_kae", Term::Entity(&subject), false);
                    }
                }
            }
            DecisionType::WorkAssignmentSupplyServicesStudies => {
                if let Some(v) = present(&f.work_assignment_etc_category) {
                    self.triple("ont", "work_assignment_etc_category", Term::Str(v), false);
                }
                if let Some(iun) = present(&f.has_related_undertaking) {
                    self.write_related_decision("has_related_undertaking", iun);
                }
                if work_assignment_expense_gate(self.fields()) {
                    self.triple("ont", "has_expense", Term::Entity("Expense/1"), false);
                }
            }
            DecisionType::Opinion => {
                if let Some(v) = present(&f.opinion_question_number) {
                    self.triple("ont", "opinion_question_number", Term::Str(v), false);
                }
                if let Some(v) = present(&f.opinion_summary) {
                    self.triple("ont", "opinion_summary", Term::Str(v), false);
                }
                if let Some(v) = present(&f.opinion_history) {
                    self.triple("ont", "opinion_history", Term::Str(v), false);
                }
                if let Some(v) = present(&f.opinion_analysis) {
                    self.triple("ont", "opinion_analysis", Term::Str(v), false);
                }
                if let Some(v) = present(&f.opinion_conclusion) {
                    self.triple("ont", "opinion_conclusion", Term::Str(v), false);
                }
                if let Some(v) = present(&f.opinion_government_institution_type) {
                    self.triple("ont", "opinion_government_institution_type", Term::Str(v), false);
                }
            }
            DecisionType::PaymentFinalisation => {
                if let Some(v) = present(&f.payment_number) {
                    self.triple("ont", "payment_number", Term::Plain(v), false);
                }
                if let Some(v) = present(&f.financial_year) {
                    self.triple("ont", "financial_year", Term::Plain(v), false);
                }
                if let Some(reason) = present(&f.reason_multiple_afm_ignorance) {
                    self.triple("ont", "reason_multiple_afm_ignorance", Term::Str(reason), false);
                    if let Some(v) = present(&f.multiple_afm_ignorance_text) {
                        self.triple("ont", "multiple_afm_ignorance_text", Term::Str(v), false);
                    }
                }
                if organization_sponsor_set(self.fields()) {
                    for (i, expense) in f.expense.iter().enumerate() {
                        if payment_expense_gate(self.fields(), expense) {
                            let subject = format!("Expense/{}", i + 1);
                            self.triple("ont", "has_expense", Term::Entity(&subject), false);
                        }
                    }
                }
            }
        }
    }

    /// FEK properties emit only when all three sub-fields are present.
    pub(crate) fn write_fek(&mut self) {
        let f = self.fields();
        if is_present(&f.fek_number) && is_present(&f.fek_issue) && is_present(&f.fek_year) {
            self.triple("ont", "fek_number", Term::Plain(crate::text(&f.fek_number)), false);
            self.triple("ont", "fek_issue", Term::Str(crate::text(&f.fek_issue)), false);
            self.triple("ont", "fek_year", Term::Plain(crate::text(&f.fek_year)), false);
        }
    }

    /// The normative-type triple gates on the normative *number*, not the
    /// type field itself.
    pub(crate) fn write_normative_type(&mut self) {
        let f = self.fields();
        if is_present(&f.normative_number) {
            self.triple(
                "ont",
                "normative_type",
                Term::Str(crate::text(&f.normative_type)),
                false,
            );
        }
    }

    /// Reference to a prior decision by IUN. The version segment stays
    /// empty: the IUN may resolve to a legacy PDF decision with no version.
    fn write_related_decision(&mut self, property: &str, iun: &str) {
        let iri = format!("{DECISION_BASE}{iun}/");
        self.triple("ont", property, Term::Entity(&iri), false);
    }

    /// BalanceAccount/BudgetApproval org-approval flag: when set it drags
    /// the related-institution name along; when unset it still emits false.
    fn write_org_approval_flag(&mut self) {
        let f = self.fields();
        if f.is_balance_account_approval_for_org {
            self.triple("ont", "is_balance_account_approval_for_org", Term::Bool(true), false);
            self.triple(
                "ont",
                "has_related_institution",
                Term::Plain(crate::text(&f.has_related_institution)),
                false,
            );
        } else {
            self.triple("ont", "is_balance_account_approval_for_org", Term::Bool(false), false);
        }
    }
}

pub(crate) fn first_expense_has_afm(expenses: &[Expense]) -> bool {
    expenses.first().is_some_and(|e| is_present(&e.afm))
}

pub(crate) fn first_expense_identifies_sponsored(expenses: &[Expense]) -> bool {
    expenses.first().is_some_and(|e| {
        is_present(&e.afm) && is_present(&e.afm_type) && is_present(&e.index)
    })
}

pub(crate) fn sponsor_fields_set(f: &diavgeia_model::DecisionFields) -> bool {
    is_present(&f.sponsor_afm) && is_present(&f.sponsor_name) && is_present(&f.sponsor_afm_type)
}

pub(crate) fn organization_sponsor_set(f: &diavgeia_model::DecisionFields) -> bool {
    is_present(&f.organization_sponsor_afm)
        && is_present(&f.organization_sponsor_afm_type)
        && is_present(&f.organization_sponsor_name)
}

/// WorkAssignment expense gate: the first row must fully identify its
/// beneficiary and the document-level amount/currency must both be set.
pub(crate) fn work_assignment_expense_gate(f: &diavgeia_model::DecisionFields) -> bool {
    f.expense.first().is_some_and(|e| {
        is_present(&e.afm)
            && is_present(&e.sponsored)
            && is_present(&e.index)
            && is_present(&e.afm_type)
    }) && is_present(&f.expense_amount)
        && is_present(&f.expense_currency)
}

/// PaymentFinalisation per-row gate: either the row identifies its
/// beneficiary or the document carries a multiple-AFM-ignorance reason, and
/// the row carries an amount and a currency.
pub(crate) fn payment_expense_gate(f: &diavgeia_model::DecisionFields, e: &Expense) -> bool {
    let identified = is_present(&e.afm) && is_present(&e.afm_type) && is_present(&e.name);
    (identified || is_present(&f.reason_multiple_afm_ignorance))
        && is_present(&e.expense_amount)
        && is_present(&e.expense_currency)
}
