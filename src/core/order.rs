//! Topological ordering of package dependencies.

use std::collections::HashSet;
use std::hash::Hash;

use crate::domain::model::{PackageId, PackageSet};

/// Outcome of a topological sort. A cycle is reported rather than raised so
/// that callers decide how fatal it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopologicalOrder<T> {
    Ordered(Vec<T>),
    /// Members of the cycle in path order, with the closing node repeated
    /// at the end.
    CycleDetected(Vec<T>),
}

impl<T> TopologicalOrder<T> {
    pub fn is_ordered(&self) -> bool {
        matches!(self, TopologicalOrder::Ordered(_))
    }

    pub fn into_result(self) -> Result<Vec<T>, Vec<T>> {
        match self {
            TopologicalOrder::Ordered(order) => Ok(order),
            TopologicalOrder::CycleDetected(cycle) => Err(cycle),
        }
    }
}

/// Sorts everything reachable from `roots` so that each node comes after all
/// of its successors.
///
/// Depth-first post-order: roots and successors are visited in the order they
/// are given, so the same input always yields the same output.
pub fn topological_sort<T, F, I>(roots: &[T], successors: F) -> TopologicalOrder<T>
where
    T: Copy + Eq + Hash,
    F: FnMut(T) -> I,
    I: IntoIterator<Item = T>,
{
    let mut walk = Walk {
        successors,
        visited: HashSet::new(),
        path: Vec::new(),
        result: Vec::new(),
    };

    for root in roots {
        if let Err(cycle) = walk.visit(*root) {
            return TopologicalOrder::CycleDetected(cycle);
        }
    }

    TopologicalOrder::Ordered(walk.result)
}

struct Walk<T, F> {
    successors: F,
    visited: HashSet<T>,
    path: Vec<T>,
    result: Vec<T>,
}

impl<T, F, I> Walk<T, F>
where
    T: Copy + Eq + Hash,
    F: FnMut(T) -> I,
    I: IntoIterator<Item = T>,
{
    fn visit(&mut self, node: T) -> Result<(), Vec<T>> {
        if let Some(start) = self.path.iter().position(|n| *n == node) {
            let mut cycle = self.path[start..].to_vec();
            cycle.push(node);
            return Err(cycle);
        }
        if !self.visited.insert(node) {
            return Ok(());
        }

        self.path.push(node);
        let next: Vec<T> = (self.successors)(node).into_iter().collect();
        for successor in next {
            self.visit(successor)?;
        }
        self.path.pop();

        self.result.push(node);
        Ok(())
    }
}

/// Full transitive dependency set of `package` (the package itself excluded),
/// each entry placed after every package it depends on.
pub fn dependency_order(packages: &PackageSet, package: PackageId) -> TopologicalOrder<PackageId> {
    topological_sort(&packages.get(package).dependencies, |id| {
        packages.get(id).dependencies.clone()
    })
}
