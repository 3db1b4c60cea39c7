//! Static Kallikratis code list: municipality display name to canonical
//! entity IRI. Bundled with the crate and parsed once; consulted read-only
//! by the SpatialPlanningDecisions rule branch.

use std::collections::HashMap;
use std::sync::OnceLock;

static TABLE: OnceLock<HashMap<String, String>> = OnceLock::new();

fn table() -> &'static HashMap<String, String> {
    TABLE.get_or_init(|| {
        serde_json::from_str(include_str!("../assets/kallikratis.json"))
            .expect("bundled kallikratis code list is valid JSON")
    })
}

pub(crate) fn municipality_iri(name: &str) -> Option<&'static str> {
    table().get(name).map(String::as_str)
}
