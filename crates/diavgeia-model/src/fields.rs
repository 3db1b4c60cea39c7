//! The decision form submission.
//!
//! One flat struct: the submission arrives as a single JSON object whose
//! populated keys depend on the decision type. Every scalar is optional and
//! decodes permissively (numbers and strings are both accepted where the
//! form historically sent either), because the emission layer gates on
//! presence rather than validating shape.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

fn opt_coerced<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

/// JS-style truthiness for flag fields: absent, `null`, `false`, `0`, `""`
/// are false; everything else is true.
fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    })
}

// ============================================================================
// Sub-records
// ============================================================================

/// A recipient / distribution row; only the name matters for emission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamedParty {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Signer {
    pub name: Option<String>,
    pub job: Option<String>,
    #[serde(default, deserialize_with = "opt_coerced")]
    pub index: Option<String>,
    /// The form's display text for the row. The header gate reads this field
    /// even though the entity block reads `name`; both gates are preserved
    /// as the submission format relies on them.
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Present {
    pub name: Option<String>,
    pub role: Option<String>,
    #[serde(default, deserialize_with = "opt_coerced")]
    pub index: Option<String>,
    pub text: Option<String>,
}

/// A narrative entry (consideration or decision), optionally linking to
/// legislation or to a prior decision.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BodyEntry {
    pub text: Option<String>,
    #[serde(default, deserialize_with = "opt_coerced")]
    pub index: Option<String>,
    /// Legislation kind (`n` for laws, `pd`, `ya`, ... or `dvg` for a prior
    /// Diavgeia decision).
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Prior-decision identifier, set when `kind == "dvg"`.
    #[serde(rename = "IUN")]
    pub iun: Option<String>,
    #[serde(default, deserialize_with = "opt_coerced")]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "opt_coerced")]
    pub number: Option<String>,
    #[serde(default, deserialize_with = "opt_coerced")]
    pub article: Option<String>,
    #[serde(default, deserialize_with = "opt_coerced")]
    pub paragraph: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Withholding {
    pub withholding_text: Option<String>,
    #[serde(default, deserialize_with = "opt_coerced")]
    pub withholding_expense: Option<String>,
    pub withholding_expense_currency: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WithKaeSubExpense {
    #[serde(default, deserialize_with = "opt_coerced")]
    pub kae: Option<String>,
    #[serde(default, deserialize_with = "opt_coerced")]
    pub expense_amount: Option<String>,
    pub expense_amount_currency: Option<String>,
}

/// One expense row. Which sub-fields must be present for the row to emit
/// anything depends on the decision type (see the rule tables in the
/// emission crate).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Expense {
    #[serde(default, deserialize_with = "opt_coerced")]
    pub afm: Option<String>,
    pub afm_type: Option<String>,
    pub name: Option<String>,
    /// Beneficiary display name used by the `Sponsored` entity blocks.
    pub sponsored: Option<String>,
    #[serde(default, deserialize_with = "opt_coerced")]
    pub expense_amount: Option<String>,
    pub expense_currency: Option<String>,
    #[serde(default, deserialize_with = "opt_coerced")]
    pub kae: Option<String>,
    #[serde(default, deserialize_with = "opt_coerced")]
    pub kae_budget_remainder: Option<String>,
    #[serde(default, deserialize_with = "opt_coerced")]
    pub kae_credit_remainder: Option<String>,
    #[serde(default, deserialize_with = "opt_coerced")]
    pub cpv: Option<String>,
    #[serde(default, deserialize_with = "opt_coerced")]
    pub index: Option<String>,
    pub payment_reason: Option<String>,
    #[serde(default, deserialize_with = "opt_coerced")]
    pub payment_with_withholdings: Option<String>,
    pub payment_with_withholdings_currency: Option<String>,
    #[serde(default)]
    pub document: Vec<String>,
    #[serde(default)]
    pub withholding: Vec<Withholding>,
    #[serde(default, rename = "withKaeSubExpense")]
    pub with_kae_sub_expense: Vec<WithKaeSubExpense>,
}

// ============================================================================
// Verification groups
// ============================================================================

/// A qualifying verification signer slot: both name and job present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationSigner {
    pub name: String,
    pub job: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct VerificationSlot {
    signer_name: Option<String>,
    signer_job: Option<String>,
}

/// A verification group: free text, an explicit index, and signer slots
/// keyed by numeric strings. Non-numeric keys and malformed slot values are
/// ignored, never an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerificationGroup {
    pub has_text: Option<String>,
    #[serde(default, deserialize_with = "opt_coerced")]
    pub index: Option<String>,
    #[serde(flatten)]
    pub slots: BTreeMap<String, Value>,
}

impl VerificationGroup {
    /// The group participates in emission only when both the overall text
    /// and the explicit index are present.
    pub fn is_active(&self) -> bool {
        crate::is_present(&self.has_text) && crate::is_present(&self.index)
    }

    /// Signer slots with both a name and a job, in ascending numeric key
    /// order (the order the submission runtime iterates integer keys).
    pub fn qualifying_signers(&self) -> Vec<VerificationSigner> {
        let mut keyed: Vec<(u64, VerificationSigner)> = self
            .slots
            .iter()
            .filter_map(|(key, value)| {
                let key = key.parse::<u64>().ok()?;
                let slot: VerificationSlot = serde_json::from_value(value.clone()).ok()?;
                let name = slot.signer_name.filter(|s| !s.is_empty())?;
                let job = slot.signer_job.filter(|s| !s.is_empty())?;
                Some((key, VerificationSigner { name, job }))
            })
            .collect();
        keyed.sort_by_key(|(key, _)| *key);
        keyed.into_iter().map(|(_, signer)| signer).collect()
    }
}

// ============================================================================
// The submission
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionFields {
    // Core document fields.
    pub title: Option<String>,
    #[serde(deserialize_with = "opt_coerced")]
    pub protocol_number: Option<String>,
    #[serde(deserialize_with = "truthy")]
    pub has_private_data: bool,
    pub government_institution_name: Option<String>,
    pub government_institution_general_administration: Option<String>,
    pub government_institution_department: Option<String>,
    pub government_institution_address: Option<String>,
    #[serde(deserialize_with = "opt_coerced")]
    pub government_institution_postalcode: Option<String>,
    #[serde(deserialize_with = "opt_coerced")]
    pub government_institution_phone: Option<String>,
    #[serde(deserialize_with = "opt_coerced")]
    pub government_institution_fax: Option<String>,
    pub government_institution_website: Option<String>,
    pub government_institution_email: Option<String>,
    pub government_institution_information: Option<String>,
    pub decision_call: Option<String>,
    pub thematic_category: Vec<String>,

    // Narrative.
    pub preconsideration: Option<String>,
    pub considerations: Vec<BodyEntry>,
    pub decisions: Vec<BodyEntry>,
    pub afterconsideration: Option<String>,

    // Parties.
    pub internal_distr: Vec<NamedParty>,
    pub recipient_for_share: Vec<NamedParty>,
    pub recipient: Vec<NamedParty>,
    pub signer: Vec<Signer>,
    pub present: Vec<Present>,
    pub verification: Vec<VerificationGroup>,

    // Expense rows (shape interpreted per decision type).
    pub expense: Vec<Expense>,

    // FEK (government gazette reference).
    #[serde(deserialize_with = "opt_coerced")]
    pub fek_number: Option<String>,
    pub fek_issue: Option<String>,
    #[serde(deserialize_with = "opt_coerced")]
    pub fek_year: Option<String>,

    // Normative / other-decisions.
    pub normative_type: Option<String>,
    #[serde(deserialize_with = "opt_coerced")]
    pub normative_number: Option<String>,
    pub publish_via: Option<String>,

    // Circular.
    #[serde(deserialize_with = "opt_coerced")]
    pub circular_number: Option<String>,

    // Appointment / Contract.
    #[serde(deserialize_with = "opt_coerced")]
    pub number_employees: Option<String>,
    pub appointment_employer_org: Option<String>,

    // LegislativeDecree.
    #[serde(deserialize_with = "opt_coerced")]
    pub legislative_decree_number: Option<String>,

    // ServiceChange.
    pub service_change_decision_type: Option<String>,

    // OccupationInvitation.
    pub vacancy_opening_type: Option<String>,

    // Cross-references to prior decisions (IUN only; see the linker notes).
    pub has_related_declaration_summary: Option<String>,
    pub has_related_undertaking: Option<String>,
    pub has_related_occupation_invitation: Option<String>,

    // Records.
    pub record_subject: Option<String>,
    #[serde(deserialize_with = "opt_coerced")]
    pub record_number: Option<String>,

    // BalanceAccount / BudgetApproval.
    pub balance_account_type: Option<String>,
    pub balance_account_time_period: Option<String>,
    #[serde(deserialize_with = "opt_coerced")]
    pub financial_year: Option<String>,
    #[serde(deserialize_with = "truthy")]
    pub is_balance_account_approval_for_org: bool,
    pub has_related_institution: Option<String>,
    pub budget_type: Option<String>,
    pub budget_category: Option<String>,

    // CollegialBodyCommisionWorkingGroup.
    pub collegial_body_party_type: Option<String>,
    pub collegial_body_decision_type: Option<String>,
    #[serde(deserialize_with = "opt_coerced")]
    pub collegial_body_refund: Option<String>,

    // CommisionWarrant.
    pub primary_officer: Option<String>,
    pub secondary_officer: Option<String>,

    // Contract.
    pub contract_decision_type: Option<String>,
    #[serde(deserialize_with = "truthy")]
    pub contract_is_co_funded: bool,
    pub contract_start: Option<String>,
    pub contract_end: Option<String>,

    // DeclarationSummary.
    pub tendering_procedure: Option<String>,
    pub selection_criterion: Option<String>,
    pub contract_type: Option<String>,
    #[serde(deserialize_with = "opt_coerced")]
    pub government_institution_budget_code: Option<String>,

    // DonationGrant / sponsor identity.
    pub donation_type: Option<String>,
    #[serde(deserialize_with = "opt_coerced")]
    pub kae: Option<String>,
    #[serde(deserialize_with = "opt_coerced")]
    pub sponsor_afm: Option<String>,
    pub sponsor_afm_type: Option<String>,
    pub sponsor_name: Option<String>,

    // SpatialPlanningDecisions.
    pub municipality: Option<String>,
    pub spatial_planning_decision_type: Option<String>,

    // GeneralSpecialSecretaryMonocraticBody.
    pub position: Option<String>,
    pub position_decision_type: Option<String>,
    pub position_org: Option<String>,

    // OwnershipTransferOfAssets.
    pub asset_name: Option<String>,

    // Undertaking.
    #[serde(deserialize_with = "opt_coerced")]
    pub entry_number: Option<String>,
    #[serde(deserialize_with = "truthy")]
    pub partialead: bool,
    #[serde(deserialize_with = "truthy")]
    pub recalled_expense: bool,

    // WorkAssignmentSupplyServicesStudies.
    pub work_assignment_etc_category: Option<String>,

    // Opinion.
    #[serde(deserialize_with = "opt_coerced")]
    pub opinion_question_number: Option<String>,
    pub opinion_summary: Option<String>,
    pub opinion_history: Option<String>,
    pub opinion_analysis: Option<String>,
    pub opinion_conclusion: Option<String>,
    pub opinion_government_institution_type: Option<String>,

    // PaymentFinalisation.
    #[serde(deserialize_with = "opt_coerced")]
    pub payment_number: Option<String>,
    pub reason_multiple_afm_ignorance: Option<String>,
    pub multiple_afm_ignorance_text: Option<String>,
    #[serde(rename = "organizationSponsorAfm", deserialize_with = "opt_coerced")]
    pub organization_sponsor_afm: Option<String>,
    #[serde(rename = "organizationSponsorAfmType")]
    pub organization_sponsor_afm_type: Option<String>,
    #[serde(rename = "organizationSponsorName")]
    pub organization_sponsor_name: Option<String>,

    // Shared single-expense scalars (several types carry one document-level
    // amount/currency/CPV instead of per-row values).
    #[serde(deserialize_with = "opt_coerced")]
    pub expense_amount: Option<String>,
    pub expense_currency: Option<String>,
    #[serde(deserialize_with = "opt_coerced")]
    pub cpv: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerces_numbers_to_strings() {
        let fields: DecisionFields = serde_json::from_str(
            r#"{"protocol_number": 4542, "number_employees": 7, "expense_amount": 500.5}"#,
        )
        .unwrap();
        assert_eq!(fields.protocol_number.as_deref(), Some("4542"));
        assert_eq!(fields.number_employees.as_deref(), Some("7"));
        assert_eq!(fields.expense_amount.as_deref(), Some("500.5"));
    }

    #[test]
    fn truthy_flags_follow_submission_semantics() {
        let fields: DecisionFields = serde_json::from_str(
            r#"{"has_private_data": "yes", "partialead": 0, "recalled_expense": false}"#,
        )
        .unwrap();
        assert!(fields.has_private_data);
        assert!(!fields.partialead);
        assert!(!fields.recalled_expense);
    }

    #[test]
    fn verification_slots_are_numeric_keys_in_ascending_order() {
        let group: VerificationGroup = serde_json::from_str(
            r#"{
                "has_text": "Ακριβές αντίγραφο",
                "index": "1",
                "10": {"signer_name": "Γ. Τρίτος", "signer_job": "Γραμματέας"},
                "2": {"signer_name": "Μ. Δεύτερη", "signer_job": "Πρόεδρος"},
                "note": "ignored",
                "3": {"signer_name": "", "signer_job": "Μέλος"}
            }"#,
        )
        .unwrap();
        assert!(group.is_active());
        let signers = group.qualifying_signers();
        assert_eq!(signers.len(), 2);
        assert_eq!(signers[0].name, "Μ. Δεύτερη");
        assert_eq!(signers[1].name, "Γ. Τρίτος");
    }

    #[test]
    fn inactive_verification_group_without_index() {
        let group: VerificationGroup =
            serde_json::from_str(r#"{"has_text": "κείμενο"}"#).unwrap();
        assert!(!group.is_active());
    }

    #[test]
    fn expense_row_decodes_nested_arrays() {
        let expense: Expense = serde_json::from_str(
            r#"{
                "afm": 123456789,
                "expense_amount": "1000",
                "expense_currency": "EUR",
                "withholding": [{"withholding_text": "ΦΟΡΟΣ", "withholding_expense": 30,
                                 "withholding_expense_currency": "EUR"}],
                "withKaeSubExpense": [{"kae": "0821", "expense_amount": 10,
                                       "expense_amount_currency": "EUR"}]
            }"#,
        )
        .unwrap();
        assert_eq!(expense.afm.as_deref(), Some("123456789"));
        assert_eq!(expense.withholding.len(), 1);
        assert_eq!(expense.with_kae_sub_expense[0].kae.as_deref(), Some("0821"));
    }
}
