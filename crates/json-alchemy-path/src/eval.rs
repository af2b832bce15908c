//! Query evaluator.

use crate::node::PathNode;
use crate::types::*;

/// Query evaluator.
pub struct QueryEval;

impl QueryEval {
    /// Evaluate a query against a tree, returning matches in document order.
    pub fn eval<N: PathNode>(query: &PathQuery, root: &N) -> Vec<Match<N>> {
        let mut results = vec![Match {
            path: Vec::new(),
            node: root.clone(),
        }];

        for segment in &query.segments {
            let mut next = Vec::new();
            for current in &results {
                if segment.recursive {
                    Self::eval_recursive(&current.node, &segment.selectors, &current.path, &mut next);
                } else {
                    for selector in &segment.selectors {
                        Self::eval_selector(&current.node, selector, &current.path, &mut next);
                    }
                }
            }
            results = next;
        }

        results
    }

    /// Evaluate and drop the paths.
    pub fn eval_nodes<N: PathNode>(query: &PathQuery, root: &N) -> Vec<N> {
        Self::eval(query, root).into_iter().map(|m| m.node).collect()
    }

    fn eval_recursive<N: PathNode>(
        node: &N,
        selectors: &[Selector],
        current_path: &[PathComponent],
        results: &mut Vec<Match<N>>,
    ) {
        for selector in selectors {
            Self::eval_selector(node, selector, current_path, results);
        }
        for (component, child) in node.children() {
            let mut path = current_path.to_vec();
            path.push(component);
            Self::eval_recursive(&child, selectors, &path, results);
        }
    }

    fn eval_selector<N: PathNode>(
        node: &N,
        selector: &Selector,
        current_path: &[PathComponent],
        results: &mut Vec<Match<N>>,
    ) {
        let mut push = |component: PathComponent, child: N| {
            let mut path = current_path.to_vec();
            path.push(component);
            results.push(Match { path, node: child });
        };

        match selector {
            Selector::Name(name) => {
                if let Some(child) = node.child_by_key(name) {
                    push(PathComponent::Key(name.clone()), child);
                }
            }
            Selector::Index(index) => {
                let Some(len) = node.array_len() else {
                    return;
                };
                let idx = if *index < 0 {
                    len as isize + index
                } else {
                    *index
                };
                if idx >= 0 {
                    if let Some(child) = node.child_by_index(idx as usize) {
                        push(PathComponent::Index(idx as usize), child);
                    }
                }
            }
            Selector::Wildcard => {
                for (component, child) in node.children() {
                    push(component, child);
                }
            }
            Selector::Slice { start, end, step } => {
                let Some(len) = node.array_len() else {
                    return;
                };
                for idx in slice_indices(len, *start, *end, step.unwrap_or(1)) {
                    if let Some(child) = node.child_by_index(idx) {
                        push(PathComponent::Index(idx), child);
                    }
                }
            }
        }
    }
}

/// Positions selected by `[start:end:step]` over an array of `len` elements,
/// with the RFC 9535 bounds rules.
pub fn slice_indices(
    len: usize,
    start: Option<isize>,
    end: Option<isize>,
    step: isize,
) -> Vec<usize> {
    let len = len as isize;
    let normalize = |i: isize| if i >= 0 { i } else { len + i };
    let mut out = Vec::new();

    if step > 0 {
        let lower = normalize(start.unwrap_or(0)).clamp(0, len);
        let upper = normalize(end.unwrap_or(len)).clamp(0, len);
        let mut i = lower;
        while i < upper {
            out.push(i as usize);
            i += step;
        }
    } else if step < 0 {
        let upper = start.map(normalize).unwrap_or(len - 1).clamp(-1, len - 1);
        let lower = end.map(normalize).unwrap_or(-1).clamp(-1, len - 1);
        let mut i = upper;
        while lower < i {
            out.push(i as usize);
            i += step;
        }
    }

    out
}
