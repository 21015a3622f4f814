//! Distinct state / municipality combinations for the filter selectors.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::store::CaseStore;

/// A state and every municipality recorded under it, both ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
  #[serde(rename = "estado")]
  pub state:          String,
  #[serde(rename = "municipios")]
  pub municipalities: Vec<String>,
}

/// Fold `(state, municipality)` pairs into one [`Region`] per state.
///
/// Input order does not matter and duplicates are collapsed.
pub fn assemble<I>(pairs: I) -> Vec<Region>
where
  I: IntoIterator<Item = (String, String)>,
{
  let mut by_state: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
  for (state, municipality) in pairs {
    by_state.entry(state).or_default().insert(municipality);
  }
  by_state
    .into_iter()
    .map(|(state, municipalities)| Region {
      state,
      municipalities: municipalities.into_iter().collect(),
    })
    .collect()
}

/// List every region present in `store` with a single grouped query.
pub async fn list_regions<S: CaseStore>(store: &S) -> Result<Vec<Region>, S::Error> {
  let pairs = store.localities().await?;
  Ok(assemble(pairs))
}
