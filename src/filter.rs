//! Case-insensitive substring search over the catalog.

use crate::catalog::VideoEntry;

/// Fold a raw query into the needle used for matching. A blank query folds
/// to `None` and matches everything.
pub fn normalize_query(query: &str) -> Option<String> {
  let trimmed = query.trim();
  if trimmed.is_empty() { None } else { Some(trimmed.to_lowercase()) }
}

/// Check whether an entry matches an already-folded needle.
/// Matches against title, description and each tag.
pub fn entry_matches(entry: &VideoEntry, needle: &str) -> bool {
  entry.title.to_lowercase().contains(needle)
    || entry.description.to_lowercase().contains(needle)
    || entry.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
}

/// Catalog positions of the entries matching `query`, in catalog order.
pub fn matching_positions(query: &str, source: &[VideoEntry]) -> Vec<usize> {
  match normalize_query(query) {
    None => (0..source.len()).collect(),
    Some(needle) => {
      source.iter().enumerate().filter(|(_, entry)| entry_matches(entry, &needle)).map(|(i, _)| i).collect()
    }
  }
}

/// The entries matching `query`, in catalog order.
pub fn filter<'a>(query: &str, source: &'a [VideoEntry]) -> Vec<&'a VideoEntry> {
  matching_positions(query, source).into_iter().map(|i| &source[i]).collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use proptest::prelude::*;

  fn sample() -> Vec<VideoEntry> {
    vec![
      VideoEntry::new("u1", "Cats", "Fluffy friends", &["animals"]),
      VideoEntry::new("u2", "Dogs", "Good boys", &["animals", "pets"]),
      VideoEntry::new("u3", "Cars", "Fast ones", &["vehicles"]),
    ]
  }

  fn titles(entries: &[&VideoEntry]) -> Vec<String> {
    entries.iter().map(|e| e.title.clone()).collect()
  }

  #[test]
  fn blank_query_is_identity() {
    let source = sample();
    assert_eq!(filter("", &source).len(), 3);
    assert_eq!(filter("   ", &source).len(), 3);
    assert_eq!(matching_positions("", &source), vec![0, 1, 2]);
  }

  #[test]
  fn matches_title_case_insensitive() {
    let source = sample();
    assert_eq!(titles(&filter("CA", &source)), vec!["Cats", "Cars"]);
  }

  #[test]
  fn matches_description() {
    let source = sample();
    assert_eq!(titles(&filter("good", &source)), vec!["Dogs"]);
  }

  #[test]
  fn matches_any_tag() {
    let source = sample();
    assert_eq!(titles(&filter("ani", &source)), vec!["Cats", "Dogs"]);
    assert_eq!(titles(&filter("PETS", &source)), vec!["Dogs"]);
  }

  #[test]
  fn surrounding_whitespace_is_ignored() {
    let source = sample();
    assert_eq!(titles(&filter("  dogs ", &source)), vec!["Dogs"]);
  }

  #[test]
  fn no_match_is_empty() {
    assert!(filter("xyz", &sample()).is_empty());
  }

  #[test]
  fn empty_tags_and_description_never_match_by_themselves() {
    let source = vec![VideoEntry::new("u", "Plain", "", &[])];
    assert!(filter("x", &source).is_empty());
    assert_eq!(filter("plain", &source).len(), 1);
  }

  fn arb_entry() -> impl Strategy<Value = VideoEntry> {
    let word = "[a-cA-C ]{0,6}";
    (word, word, proptest::collection::vec(word, 0..3)).prop_map(|(title, description, tags)| VideoEntry {
      url: "u".to_string(),
      title,
      description,
      tags,
    })
  }

  proptest! {
    #[test]
    fn result_is_ordered_subsequence(
      source in proptest::collection::vec(arb_entry(), 0..20),
      query in "[a-cA-C]{0,3}",
    ) {
      let positions = matching_positions(&query, &source);
      prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
      prop_assert!(positions.iter().all(|&i| i < source.len()));
    }

    #[test]
    fn agrees_with_brute_force(source in proptest::collection::vec(arb_entry(), 0..20), query in "[a-cA-C]{1,3}") {
      let needle = query.to_lowercase();
      let expected: Vec<usize> = (0..source.len())
        .filter(|&i| {
          let e = &source[i];
          let mut fields = vec![e.title.to_lowercase(), e.description.to_lowercase()];
          fields.extend(e.tags.iter().map(|t| t.to_lowercase()));
          fields.iter().any(|f| f.contains(&needle))
        })
        .collect();
      prop_assert_eq!(matching_positions(&query, &source), expected);
    }

    #[test]
    fn deterministic(source in proptest::collection::vec(arb_entry(), 0..20), query in "[a-c]{0,2}") {
      prop_assert_eq!(matching_positions(&query, &source), matching_positions(&query, &source));
    }
  }
}
