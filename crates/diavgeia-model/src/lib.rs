//! Decision record model for Diavgeia N3 generation.
//!
//! A `Decision` is the immutable input of one generation call: the closed
//! decision-type tag, the identity the dispatcher assigns (IUN, version,
//! organization, units) and the form submission itself (`DecisionFields`).
//!
//! The model performs no validation beyond decoding: missing or empty fields
//! are represented as absent and the emission layer gates on presence
//! (best-effort conditional emission, never an error).

pub mod fields;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use fields::{
    BodyEntry, DecisionFields, Expense, NamedParty, Present, Signer, VerificationGroup,
    VerificationSigner, WithKaeSubExpense, Withholding,
};

// ============================================================================
// Decision type enumeration
// ============================================================================

/// The closed set of decision types Diavgeia accepts.
///
/// The tag spelling is the wire spelling: it is used verbatim as the RDF
/// class of the document root (`<> a ont:<tag>`), so round-tripping through
/// `as_str`/`FromStr` must be exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecisionType {
    Normative,
    Circular,
    Appointment,
    Award,
    LegislativeDecree,
    OtherDecisions,
    OtherDevelopmentLaw,
    ServiceChange,
    OccupationInvitation,
    Records,
    BalanceAccount,
    BudgetApproval,
    CollegialBodyCommisionWorkingGroup,
    CommisionWarrant,
    Contract,
    DeclarationSummary,
    DonationGrant,
    SpatialPlanningDecisions,
    ExpenditureApproval,
    GeneralSpecialSecretaryMonocraticBody,
    OwnershipTransferOfAssets,
    SuccessfulAppointedRunnerUpList,
    Undertaking,
    WorkAssignmentSupplyServicesStudies,
    Opinion,
    PaymentFinalisation,
}

impl DecisionType {
    pub const ALL: [DecisionType; 26] = [
        DecisionType::Normative,
        DecisionType::Circular,
        DecisionType::Appointment,
        DecisionType::Award,
        DecisionType::LegislativeDecree,
        DecisionType::OtherDecisions,
        DecisionType::OtherDevelopmentLaw,
        DecisionType::ServiceChange,
        DecisionType::OccupationInvitation,
        DecisionType::Records,
        DecisionType::BalanceAccount,
        DecisionType::BudgetApproval,
        DecisionType::CollegialBodyCommisionWorkingGroup,
        DecisionType::CommisionWarrant,
        DecisionType::Contract,
        DecisionType::DeclarationSummary,
        DecisionType::DonationGrant,
        DecisionType::SpatialPlanningDecisions,
        DecisionType::ExpenditureApproval,
        DecisionType::GeneralSpecialSecretaryMonocraticBody,
        DecisionType::OwnershipTransferOfAssets,
        DecisionType::SuccessfulAppointedRunnerUpList,
        DecisionType::Undertaking,
        DecisionType::WorkAssignmentSupplyServicesStudies,
        DecisionType::Opinion,
        DecisionType::PaymentFinalisation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionType::Normative => "Normative",
            DecisionType::Circular => "Circular",
            DecisionType::Appointment => "Appointment",
            DecisionType::Award => "Award",
            DecisionType::LegislativeDecree => "LegislativeDecree",
            DecisionType::OtherDecisions => "OtherDecisions",
            DecisionType::OtherDevelopmentLaw => "OtherDevelopmentLaw",
            DecisionType::ServiceChange => "ServiceChange",
            DecisionType::OccupationInvitation => "OccupationInvitation",
            DecisionType::Records => "Records",
            DecisionType::BalanceAccount => "BalanceAccount",
            DecisionType::BudgetApproval => "BudgetApproval",
            DecisionType::CollegialBodyCommisionWorkingGroup => {
                "CollegialBodyCommisionWorkingGroup"
            }
            DecisionType::CommisionWarrant => "CommisionWarrant",
            DecisionType::Contract => "Contract",
            DecisionType::DeclarationSummary => "DeclarationSummary",
            DecisionType::DonationGrant => "DonationGrant",
            DecisionType::SpatialPlanningDecisions => "SpatialPlanningDecisions",
            DecisionType::ExpenditureApproval => "ExpenditureApproval",
            DecisionType::GeneralSpecialSecretaryMonocraticBody => {
                "GeneralSpecialSecretaryMonocraticBody"
            }
            DecisionType::OwnershipTransferOfAssets => "OwnershipTransferOfAssets",
            DecisionType::SuccessfulAppointedRunnerUpList => "SuccessfulAppointedRunnerUpList",
            DecisionType::Undertaking => "Undertaking",
            DecisionType::WorkAssignmentSupplyServicesStudies => {
                "WorkAssignmentSupplyServicesStudies"
            }
            DecisionType::Opinion => "Opinion",
            DecisionType::PaymentFinalisation => "PaymentFinalisation",
        }
    }
}

impl fmt::Display for DecisionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown decision type: {0}")]
pub struct UnknownDecisionType(pub String);

impl FromStr for DecisionType {
    type Err = UnknownDecisionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DecisionType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownDecisionType(s.to_string()))
    }
}

// ============================================================================
// Decision record
// ============================================================================

/// One decision submission, ready for N3 generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub decision_type: DecisionType,
    /// Unique decision identifier, assigned by the dispatcher. Not validated.
    pub iun: String,
    pub version: String,
    pub organization_id: String,
    #[serde(default)]
    pub unit_ids: Vec<String>,
    #[serde(default)]
    pub fields: DecisionFields,
    /// Suppresses type-specific and auxiliary entity emission; used to
    /// measure baseline generation throughput.
    #[serde(default)]
    pub benchmark: bool,
}

impl Decision {
    pub fn new(
        decision_type: DecisionType,
        iun: impl Into<String>,
        version: impl Into<String>,
        organization_id: impl Into<String>,
        unit_ids: Vec<String>,
        fields: DecisionFields,
    ) -> Self {
        Self {
            decision_type,
            iun: iun.into(),
            version: version.into(),
            organization_id: organization_id.into(),
            unit_ids,
            fields,
            benchmark: false,
        }
    }
}

/// Presence test used by every emission gate: a field participates only when
/// it is set and non-empty (the submission format sends `""` for untouched
/// form inputs).
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

pub fn is_present(value: &Option<String>) -> bool {
    present(value).is_some()
}
