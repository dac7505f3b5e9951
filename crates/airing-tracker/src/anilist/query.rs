//! Batched airing schedule query construction.
//!
//! Each distinct MAL id gets an alias (`anime0`, `anime1`, ...) in request
//! order and its own `$idN` variable. The plan is kept alongside the request
//! so the response is decoded by alias, never by the key order of the
//! returned document.

use serde_json::{Map, Value};
use std::collections::HashSet;

/// Selection requested for every aliased `Media` lookup
const SCHEDULE_SELECTION: &str =
    "airingSchedule(notYetAired: true, perPage: 1) { nodes { episode airingAt timeUntilAiring } }";

/// Ordered (MAL id, alias) pairs for one batch request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasPlan {
    pairs: Vec<(u32, String)>,
}

impl AliasPlan {
    /// Build a plan from ids, keeping the first occurrence of each id
    pub fn new(ids: &[u32]) -> Self {
        let mut seen = HashSet::new();
        let pairs = ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .enumerate()
            .map(|(idx, id)| (id, format!("anime{}", idx)))
            .collect();

        Self { pairs }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Distinct ids in request order
    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.pairs.iter().map(|(id, _)| *id)
    }

    /// (id, alias) pairs in request order
    pub fn pairs(&self) -> &[(u32, String)] {
        &self.pairs
    }

    /// GraphQL document with one aliased `Media` field per id
    pub fn query(&self) -> String {
        let params: Vec<String> = (0..self.pairs.len())
            .map(|idx| format!("$id{}: Int", idx))
            .collect();

        let mut query = format!("query ({}) {{\n", params.join(", "));
        for (idx, (_, alias)) in self.pairs.iter().enumerate() {
            query.push_str(&format!(
                "  {}: Media(idMal: $id{}, type: ANIME) {{ {} }}\n",
                alias, idx, SCHEDULE_SELECTION
            ));
        }
        query.push('}');
        query
    }

    /// Variables object binding each `$idN` to its MAL id
    pub fn variables(&self) -> Value {
        let vars: Map<String, Value> = self
            .pairs
            .iter()
            .enumerate()
            .map(|(idx, (id, _))| (format!("id{}", idx), Value::from(*id)))
            .collect();
        Value::Object(vars)
    }

    /// Full JSON request body
    pub fn request_body(&self) -> Value {
        serde_json::json!({
            "query": self.query(),
            "variables": self.variables(),
        })
    }
}
