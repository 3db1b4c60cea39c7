//! End-to-end generation tests: whole documents for representative decision
//! types, checked against the exact text the triple-store loader accepts.

use chrono::{TimeZone, Utc};
use diavgeia_emit::generate_at;
use diavgeia_model::{Decision, DecisionFields, DecisionType};

fn decision(decision_type: DecisionType, fields: DecisionFields) -> Decision {
    Decision::new(
        decision_type,
        "ΩΞΒ54653ΠΣ-ΡΩΣ",
        "1",
        "6234",
        vec![],
        fields,
    )
}

fn fields_from_json(json: &str) -> DecisionFields {
    serde_json::from_str(json).unwrap()
}

#[test]
fn circular_document_is_generated_verbatim() {
    let fields = fields_from_json(
        r#"{
            "title": "Εγκύκλιος δοκιμής",
            "government_institution_name": "Υπουργείο Παιδείας",
            "protocol_number": 4542,
            "circular_number": "123"
        }"#,
    );
    let d = decision(DecisionType::Circular, fields);
    let now = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();
    let document = generate_at(&d, now);

    let expected = format!(
        "@base <http://diavgeia.gov.gr/eli/decision/ΩΞΒ54653ΠΣ-ΡΩΣ/1/>.\n\
         @prefix ont: <http://diavgeia.gov.gr/ontology/>.\n\
         @prefix eli: <http://data.europa.eu/eli/ontology#>.\n\
         @prefix leg: <http://legislation.di.uoa.gr/eli/>.\n\
         \n\
         <> a ont:Circular;\n\
         \tont:version \"1\";\n\
         \tont:iun \"ΩΞΒ54653ΠΣ-ΡΩΣ\"@el;\n\
         \teli:title \"Εγκύκλιος δοκιμής\"@el;\n\
         \tont:has_private_data false;\n\
         \tont:government_institution_name \"Υπουργείο Παιδείας\"@el;\n\
         \tont:protocol_number \"4542\"@el;\n\
         \tont:organization_id \"6234\";\n\
         \tont:circular_number \"123\";\n\
         \tont:submission_timestamp \"{}\";\n\
         \teli:date_publication \"2026-08-30\"^^<http://www.w3.org/2001/XMLSchema#date>.\n\
         \n",
        now.timestamp_millis()
    );
    assert_eq!(document, expected);
}

#[test]
fn declaration_summary_emits_expense_block_with_currency_terminator() {
    let fields = fields_from_json(
        r#"{
            "title": "Περίληψη διακήρυξης",
            "expense_amount": "1000",
            "expense_currency": "ΕΥΡΩ",
            "cpv": "45214400-4"
        }"#,
    );
    let d = decision(DecisionType::DeclarationSummary, fields);
    let now = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();
    let document = generate_at(&d, now);

    assert!(document.contains("\tont:has_expense <Expense/1>;\n"));
    assert!(document.contains(
        "<Expense/1> a ont:Expense;\n\
         \tont:cpv \"45214400-4\";\n\
         \tont:expense_amount \"1000\";\n\
         \tont:expense_amount_currency \"ΕΥΡΩ\"@el.\n\n"
    ));
}

#[test]
fn declaration_summary_without_currency_suppresses_whole_expense_block() {
    let fields = fields_from_json(
        r#"{"title": "Περίληψη", "expense_amount": "1000", "cpv": "45214400-4"}"#,
    );
    let d = decision(DecisionType::DeclarationSummary, fields);
    let now = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();
    let document = generate_at(&d, now);

    assert!(!document.contains("has_expense"));
    assert!(!document.contains("<Expense/1>"));
    assert!(!document.contains("cpv"));
}

#[test]
fn verifier_numbering_is_monotonic_across_groups() {
    let fields = fields_from_json(
        r#"{
            "verification": [
                {
                    "has_text": "Ακριβές αντίγραφο",
                    "index": "1",
                    "1": {"signer_name": "Α. Πρώτος", "signer_job": "Διευθυντής"},
                    "2": {"signer_name": "Β. Δεύτερη", "signer_job": "Τμηματάρχης"}
                },
                {
                    "has_text": "Θεωρήθηκε",
                    "index": "2",
                    "1": {"signer_name": "Γ. Τρίτος", "signer_job": "Γραμματέας"},
                    "2": {"signer_name": "Δ. Τέταρτη", "signer_job": "Πρόεδρος"}
                }
            ]
        }"#,
    );
    let d = decision(DecisionType::Records, fields);
    let now = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();
    let document = generate_at(&d, now);

    assert!(document.contains("\tont:has_verified <Verification/1>;\n"));
    assert!(document.contains("\tont:has_verified <Verification/2>;\n"));
    assert!(document.contains(
        "<Verification/1> a ont:Verification;\n\
         \tont:verified_by <Verifier/1>;\n\
         \tont:verified_by <Verifier/2>;\n\
         \tont:has_text \"Ακριβές αντίγραφο\"@el.\n\n"
    ));
    assert!(document.contains(
        "<Verification/2> a ont:Verification;\n\
         \tont:verified_by <Verifier/3>;\n\
         \tont:verified_by <Verifier/4>;\n\
         \tont:has_text \"Θεωρήθηκε\"@el.\n\n"
    ));
    assert!(document.contains(
        "<Verifier/4> a ont:Verifier;\n\
         \tont:verifier_job \"Πρόεδρος\"@el;\n\
         \tont:verifier_name \"Δ. Τέταρτη\"@el.\n\n"
    ));
    assert!(!document.contains("Verifier/5"));
}

#[test]
fn benchmark_output_is_a_prefix_of_full_output() {
    let fields = fields_from_json(
        r#"{
            "title": "Πρακτικά συνεδρίασης",
            "signer": [{"name": "Ε. Υπογράφουσα", "job": "Πρόεδρος",
                        "index": "1", "text": "Ε. Υπογράφουσα, Πρόεδρος"}]
        }"#,
    );
    let mut full = decision(DecisionType::Records, fields.clone());
    let mut bench = decision(DecisionType::Records, fields);
    full.benchmark = false;
    bench.benchmark = true;

    let now = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();
    let full_doc = generate_at(&full, now);
    let bench_doc = generate_at(&bench, now);

    assert!(full_doc.len() > bench_doc.len());
    assert!(full_doc.starts_with(&bench_doc));
    assert!(full_doc.contains("<Signer/1> a ont:Signer;"));
    assert!(!bench_doc.contains("<Signer/1> a ont:Signer;"));
}

#[test]
fn omitting_one_optional_field_removes_exactly_its_triple() {
    let with = fields_from_json(r#"{"title": "Εγκύκλιος", "circular_number": "123"}"#);
    let without = fields_from_json(r#"{"title": "Εγκύκλιος", "circular_number": ""}"#);
    let now = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();

    let doc_with = generate_at(&decision(DecisionType::Circular, with), now);
    let doc_without = generate_at(&decision(DecisionType::Circular, without), now);

    let line = "\tont:circular_number \"123\";\n";
    assert!(doc_with.contains(line));
    assert_eq!(doc_with.replacen(line, "", 1), doc_without);
}

#[test]
fn body_entries_link_legislation_and_resolve_forward_references() {
    let fields = fields_from_json(
        r#"{
            "title": "Απόφαση",
            "preconsideration": "Έχοντας υπόψη:",
            "considerations": [
                {"text": "Τις διατάξεις του ν. 3861/2010.", "index": "1",
                 "type": "n", "year": 2010, "number": 3861},
                {"text": "Την προηγούμενη απόφαση.", "index": "2",
                 "type": "dvg", "IUN": "ΒΞΛ9469Β7Γ-ΙΡΛ"}
            ],
            "decisions": [{"text": "Αποφασίζουμε τα εξής.", "index": "1"}],
            "afterconsideration": "Η απόφαση ισχύει άμεσα."
        }"#,
    );
    let d = decision(DecisionType::OtherDecisions, fields);
    let now = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();
    let document = generate_at(&d, now);

    assert!(document.contains("\tont:has_preconsideration <Preconsideration>;\n"));
    assert!(document.contains("\tont:has_considered <Consideration/1>;\n"));
    assert!(document.contains("\tont:has_considered <Consideration/2>;\n"));
    assert!(document.contains("\tont:has_decided <Decision/1>;\n"));
    assert!(document.contains("\tont:has_afterdecision <AfterDecision>;\n"));

    assert!(document.contains(
        "<PreConsideration> a ont:PreConsideration;\n\
         \tont:has_text \"Έχοντας υπόψη:\"@el.\n\n"
    ));
    assert!(document.contains(
        "<Consideration/1> a ont:Consideration;\n\
         \tont:considers leg:n\\/2010\\/3861;\n\
         \tont:has_text \"Τις διατάξεις του ν. 3861/2010.\"@el.\n\n"
    ));
    assert!(document.contains(
        "<Consideration/2> a ont:Consideration;\n\
         \tont:considers <http://diavgeia.gov.gr/eli/decision/ΒΞΛ9469Β7Γ-ΙΡΛ/>;\n\
         \tont:has_text \"Την προηγούμενη απόφαση.\"@el.\n\n"
    ));
    assert!(document.contains(
        "<AfterConsideration> a ont:AfterConsideration;\n\
         \tont:has_text \"Η απόφαση ισχύει άμεσα.\"@el.\n\n"
    ));
}

#[test]
fn award_fans_out_sponsored_entities_from_one_expense() {
    let fields = fields_from_json(
        r#"{
            "title": "Κατακύρωση",
            "expense_amount": "25000",
            "expense_currency": "ΕΥΡΩ",
            "expense": [
                {"afm": "123456789", "afm_type": "ΑΦΜ Ελλάδος",
                 "name": "ΤΕΧΝΙΚΗ ΑΕ", "index": "1"},
                {"afm": "987654321", "afm_type": "ΑΦΜ Ελλάδος",
                 "name": "ΔΟΜΙΚΗ ΕΠΕ", "index": "2"}
            ]
        }"#,
    );
    let d = decision(DecisionType::Award, fields);
    let now = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();
    let document = generate_at(&d, now);

    assert!(document.contains("\tont:has_expense <Expense/1>;\n"));
    assert!(document.contains(
        "<Expense/1> a ont:Expense;\n\
         \tont:expense_amount \"25000\";\n\
         \tont:has_sponsored <Sponsored/1>;\n\
         \tont:has_sponsored <Sponsored/2>;\n\
         \tont:expense_amount_currency \"ΕΥΡΩ\"@el.\n\n"
    ));
    assert!(document.contains(
        "<Sponsored/2> a ont:Sponsored;\n\
         \tont:afm \"987654321\";\n\
         \tont:afm_type \"ΑΦΜ Ελλάδος\"@el;\n\
         \tont:name \"ΔΟΜΙΚΗ ΕΠΕ\"@el.\n\n"
    ));
}

#[test]
fn commision_warrant_refs_by_position_and_blocks_by_explicit_index() {
    let fields = fields_from_json(
        r#"{
            "title": "Εντολή μετακίνησης",
            "expense": [
                {"kae": "0821", "expense_amount": "150", "expense_currency": "ΕΥΡΩ",
                 "index": "7"}
            ]
        }"#,
    );
    let d = decision(DecisionType::CommisionWarrant, fields);
    let now = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();
    let document = generate_at(&d, now);

    // Reference numbered by row position, block by the row's index field.
    assert!(document.contains("\tont:has_expense_with_kae <ExpenseWithKae/1>;\n"));
    assert!(!document.contains("<ExpenseWithKae/1> a ont:ExpenseWithKae;"));
    assert!(document.contains(
        "<ExpenseWithKae/7> a ont:ExpenseWithKae;\n\
         \tont:expense_amount \"150\";\n\
         \tont:expense_amount_currency \"ΕΥΡΩ\"@el;\n\
         \tont:kae \"0821\".\n\n"
    ));
}

#[test]
fn undertaking_block_emits_without_forward_reference_for_unidentified_beneficiary() {
    let fields = fields_from_json(
        r#"{
            "title": "Ανάληψη υποχρέωσης",
            "expense": [
                {"kae": "0821", "expense_amount": "2000", "expense_currency": "ΕΥΡΩ",
                 "kae_budget_remainder": "8000", "kae_credit_remainder": "5000",
                 "index": "3"}
            ]
        }"#,
    );
    let d = decision(DecisionType::Undertaking, fields);
    let now = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();
    let document = generate_at(&d, now);

    // The row carries no beneficiary, so the root-block reference stays out
    // while the looser block condition still emits the entity (by its index
    // field, not its position).
    assert!(!document.contains("has_expense_with_kae"));
    assert!(document.contains(
        "<ExpenseWithKae/3> a ont:ExpenseWithKae;\n\
         \tont:expense_amount \"2000\";\n\
         \tont:expense_amount_currency \"ΕΥΡΩ\"@el;\n\
         \tont:kae \"0821\";\n\
         \tont:kae_budget_remainder \"8000\";\n\
         \tont:kae_credit_remainder \"5000\".\n\n"
    ));
    assert!(!document.contains("has_sponsored"));
    assert!(!document.contains(" a ont:Sponsored"));
}

#[test]
fn undertaking_identified_row_refs_by_position_and_blocks_by_index() {
    let fields = fields_from_json(
        r#"{
            "title": "Ανάληψη υποχρέωσης",
            "expense": [
                {"kae": "0821", "expense_amount": "2000", "expense_currency": "ΕΥΡΩ",
                 "kae_budget_remainder": "8000", "kae_credit_remainder": "5000",
                 "index": "3", "afm": "123456789", "afm_type": "ΑΦΜ Ελλάδος",
                 "sponsored": "ΤΕΧΝΙΚΗ ΑΕ"}
            ]
        }"#,
    );
    let d = decision(DecisionType::Undertaking, fields);
    let now = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();
    let document = generate_at(&d, now);

    assert!(document.contains("\tont:has_expense_with_kae <ExpenseWithKae/1>;\n"));
    assert!(document.contains(
        "<ExpenseWithKae/3> a ont:ExpenseWithKae;\n\
         \tont:expense_amount \"2000\";\n\
         \tont:expense_amount_currency \"ΕΥΡΩ\"@el;\n\
         \tont:kae \"0821\";\n\
         \tont:kae_budget_remainder \"8000\";\n\
         \tont:has_sponsored <Sponsored/1>;\n\
         \tont:kae_credit_remainder \"5000\".\n\n"
    ));
    assert!(document.contains(
        "<Sponsored/1> a ont:Sponsored;\n\
         \tont:afm \"123456789\";\n\
         \tont:afm_type \"ΑΦΜ Ελλάδος\"@el;\n\
         \tont:name \"ΤΕΧΝΙΚΗ ΑΕ\"@el.\n\n"
    ));
}

#[test]
fn payment_finalisation_collects_withholdings_across_rows() {
    let fields = fields_from_json(
        r#"{
            "title": "Οριστικοποίηση πληρωμής",
            "organizationSponsorAfm": "090000045",
            "organizationSponsorAfmType": "ΑΦΜ Ελλάδος",
            "organizationSponsorName": "ΔΗΜΟΣ ΑΘΗΝΑΙΩΝ",
            "expense": [
                {"afm": "123456789", "afm_type": "ΑΦΜ Ελλάδος", "name": "ΠΡΟΜΗΘΕΥΤΗΣ Α",
                 "expense_amount": "500", "expense_currency": "ΕΥΡΩ",
                 "withholding": [{"withholding_text": "ΦΟΡΟΣ 4%", "withholding_expense": "20",
                                  "withholding_expense_currency": "ΕΥΡΩ"}]},
                {"afm": "987654321", "afm_type": "ΑΦΜ Ελλάδος", "name": "ΠΡΟΜΗΘΕΥΤΗΣ Β",
                 "expense_amount": "300", "expense_currency": "ΕΥΡΩ",
                 "withholding": [{"withholding_text": "ΦΟΡΟΣ 8%", "withholding_expense": "24",
                                  "withholding_expense_currency": "ΕΥΡΩ"}]}
            ]
        }"#,
    );
    let d = decision(DecisionType::PaymentFinalisation, fields);
    let now = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();
    let document = generate_at(&d, now);

    assert!(document.contains("\tont:has_withHolding <WithHolding/1>;\n"));
    assert!(document.contains("\tont:has_withHolding <WithHolding/2>;\n"));
    assert!(document.contains(
        "<WithHolding/2> a ont:WithHolding;\n\
         \tont:withholding_text \"ΦΟΡΟΣ 8%\"@el;\n\
         \tont:withholding_expense \"24\";\n\
         \tont:withholding_expense_currency \"ΕΥΡΩ\"@el.\n\n"
    ));
    assert!(document.contains(
        "<OrganizationSponsor/1> a ont:OrganizationSponsor;\n\
         \tont:afm \"090000045\"@el;\n\
         \tont:afm_type \"ΑΦΜ Ελλάδος\"@el;\n\
         \tont:name \"ΔΗΜΟΣ ΑΘΗΝΑΙΩΝ\"@el.\n\n"
    ));
    assert!(document.contains(
        "<Sponsored/1> a ont:Sponsored;\n\
         \tont:name \"ΠΡΟΜΗΘΕΥΤΗΣ Α\"@el;\n\
         \tont:afm \"123456789\";\n\
         \tont:afm_type \"ΑΦΜ Ελλάδος\"@el.\n\n"
    ));
}
