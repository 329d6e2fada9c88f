//! Attribute-to-character bipartite matching.
//!
//! Left side: the five attributes. Right side: characters owning at least one
//! card of that attribute. Kuhn's augmenting-path search; with five left
//! vertices and at most a few dozen characters this is a handful of steps.

use deck_core::CardDetail;
use deck_core::model::attr::Attr;
use std::collections::HashMap;

const ATTRS: usize = Attr::ALL.len();

/// Size of the maximum matching, i.e. how many attributes can each be covered
/// by a different character.
pub fn attribute_matching(cards: &[&CardDetail]) -> usize {
    let mut edges: [Vec<u32>; ATTRS] = Default::default();
    for card in cards {
        let characters = &mut edges[card.attr.index()];
        if !characters.contains(&card.character_id) {
            characters.push(card.character_id);
        }
    }

    let mut owner: HashMap<u32, usize> = HashMap::new();
    let mut matched = 0;
    for attr in 0..ATTRS {
        let mut visited = [false; ATTRS];
        if augment(attr, &edges, &mut owner, &mut visited) {
            matched += 1;
        }
    }
    matched
}

fn augment(
    attr: usize,
    edges: &[Vec<u32>; ATTRS],
    owner: &mut HashMap<u32, usize>,
    visited: &mut [bool; ATTRS],
) -> bool {
    visited[attr] = true;
    for &character in &edges[attr] {
        let free = match owner.get(&character).copied() {
            None => true,
            Some(other) => !visited[other] && augment(other, edges, owner, visited),
        };
        if free {
            owner.insert(character, attr);
            return true;
        }
    }
    false
}
