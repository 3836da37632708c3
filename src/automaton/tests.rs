use crate::{Index, IndexConfig, TableLayout};
use std::sync::Arc;

type Found = Vec<(usize, usize, usize)>;

fn build(keywords: &[&[u8]], layout: TableLayout) -> Index<usize> {
    let mut index = Index::with_config(IndexConfig::default().with_layout(layout));
    for (i, kw) in keywords.iter().enumerate() {
        index.enter(kw, i).unwrap();
    }
    index.fix().unwrap();
    index
}

fn run(index: &Index<usize>, text: &[u8]) -> Found {
    index
        .find_all(text)
        .unwrap()
        .into_iter()
        .map(|m| (m.start, m.end, *m.object))
        .collect()
}

/// Brute force: every keyword at every end offset, longest first, then in
/// entry order.
fn naive(keywords: &[&[u8]], text: &[u8]) -> Found {
    let mut found = Vec::new();
    for end in 1..=text.len() {
        let mut at_end: Found = keywords
            .iter()
            .enumerate()
            .filter(|(_, kw)| kw.len() <= end && &text[end - kw.len()..end] == **kw)
            .map(|(i, kw)| (end - kw.len(), end, i))
            .collect();
        at_end.sort_by_key(|&(start, _, i)| (start, i));
        found.extend(at_end);
    }
    found
}

/// Every string over `alphabet` with length in `1..=max_len`.
fn all_strings(alphabet: &[u8], max_len: usize) -> Vec<Vec<u8>> {
    let mut out: Vec<Vec<u8>> = Vec::new();
    let mut layer: Vec<Vec<u8>> = vec![Vec::new()];
    for _ in 0..max_len {
        layer = layer
            .iter()
            .flat_map(|prefix| {
                alphabet.iter().map(move |&b| {
                    let mut s = prefix.clone();
                    s.push(b);
                    s
                })
            })
            .collect();
        out.extend(layer.iter().cloned());
    }
    out
}

#[test]
fn test_overlap_completeness() {
    let index = build(&[b"a", b"aa"], TableLayout::Dense);
    assert_eq!(
        run(&index, b"aaa"),
        vec![(0, 1, 0), (0, 2, 1), (1, 2, 0), (1, 3, 1), (2, 3, 0)]
    );
}

#[test]
fn test_nested_keywords() {
    let index = build(&[b"he", b"she", b"his", b"hers"], TableLayout::Dense);
    assert_eq!(run(&index, b"ushers"), vec![(1, 4, 1), (2, 4, 0), (2, 6, 3)]);
}

#[test]
fn test_tie_break_own_before_inherited() {
    let index = build(&[b"c", b"bc", b"abc", b"abc"], TableLayout::Dense);
    assert_eq!(
        run(&index, b"abc"),
        vec![(0, 3, 2), (0, 3, 3), (1, 3, 1), (2, 3, 0)]
    );
}

#[test]
fn test_duplicate_keyword_entries_both_surface() {
    let index = build(&[b"abc", b"abc"], TableLayout::Packed);
    assert_eq!(run(&index, b"xabcx"), vec![(1, 4, 0), (1, 4, 1)]);
}

#[test]
fn test_repeated_queries_are_identical() {
    let index = build(&[b"he", b"she", b"his", b"hers"], TableLayout::Dense);
    let text = b"she sells his hers here";
    let first = run(&index, text);
    assert!(!first.is_empty());
    for _ in 0..5 {
        assert_eq!(run(&index, text), first);
    }
}

#[test]
fn test_no_match_after_failed_prefix() {
    let index = build(&[b"abcd", b"bce"], TableLayout::Dense);
    // "abc" then 'e' falls back to "bc" and completes "bce"
    assert_eq!(run(&index, b"abce"), vec![(1, 4, 1)]);
    assert!(run(&index, b"abcx").is_empty());
}

#[test]
fn test_binary_keywords() {
    let keywords: [&[u8]; 3] = [&[0x00, 0xFF], &[0xFF], &[0xFF, 0xFF, 0x00]];
    let text: [u8; 5] = [0x00, 0xFF, 0xFF, 0x00, 0xFF];
    for layout in [TableLayout::Dense, TableLayout::Packed] {
        let index = build(&keywords, layout);
        assert_eq!(run(&index, &text), naive(&keywords, &text));
    }
}

#[test]
fn test_matches_agree_with_naive_search() {
    let keyword_sets: Vec<Vec<Vec<u8>>> = vec![
        all_strings(b"ab", 2),
        all_strings(b"ab", 3),
        vec![b"aab".to_vec(), b"ab".to_vec(), b"bab".to_vec(), b"b".to_vec()],
        vec![b"abab".to_vec(), b"bab".to_vec(), b"ab".to_vec(), b"ab".to_vec()],
    ];
    let texts = all_strings(b"abc", 6);

    for set in &keyword_sets {
        let keywords: Vec<&[u8]> = set.iter().map(Vec::as_slice).collect();
        let dense = build(&keywords, TableLayout::Dense);
        let packed = build(&keywords, TableLayout::Packed);
        for text in &texts {
            let expected = naive(&keywords, text);
            assert_eq!(run(&dense, text), expected, "text {:?}", text);
            assert_eq!(run(&packed, text), expected, "text {:?}", text);
        }
    }
}

#[test]
fn test_match_length_equals_keyword_length() {
    let keywords: [&[u8]; 4] = [b"x", b"xyz", b"yz", b"zzz"];
    let index = build(&keywords, TableLayout::Dense);
    for m in index.find_all(b"xyzzzxyz").unwrap() {
        assert_eq!(m.len(), keywords[*m.object].len());
    }
}

#[test]
fn test_state_count_reflects_shared_prefixes() {
    let index = build(&[b"food", b"ood", b"fool"], TableLayout::Dense);
    // root + f,o,o,d + l + o,o,d
    assert_eq!(index.state_count(), 1 + 4 + 1 + 3);
    assert_eq!(index.keyword_count(), 3);
    assert_eq!(index.max_keyword_len(), 4);
}

#[test]
fn test_trie_failure_links_set_after_fix() {
    let index = build(&[b"food", b"ood"], TableLayout::Dense);
    let trie = index.trie();
    let foo = trie.walk(b"foo").unwrap();
    let food = trie.walk(b"food").unwrap();
    assert_eq!(trie.states()[foo].failure, trie.walk(b"oo").unwrap());
    assert_eq!(trie.states()[food].failure, trie.walk(b"ood").unwrap());

    let automaton = index.automaton().unwrap();
    assert_eq!(automaton.outputs_at(food).len(), 2);
}

#[test]
fn test_concurrent_queries_on_fixed_index() {
    let index = Arc::new(build(&[b"he", b"she", b"his", b"hers"], TableLayout::Dense));
    let expected = run(&index, b"this here is history");

    std::thread::scope(|scope| {
        for _ in 0..4 {
            let index = Arc::clone(&index);
            let expected = &expected;
            scope.spawn(move || {
                for _ in 0..100 {
                    assert_eq!(&run(&index, b"this here is history"), expected);
                }
            });
        }
    });
}
