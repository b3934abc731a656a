use crate::error::GenError;
use ffi_types::{NamedTypeRef, ParsedResult, QualifiedName, StructureType, TypeDescriptor};
use indexmap::{IndexMap, IndexSet};
use std::collections::HashSet;
use tracing::debug;

/// One entry of the structure section, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmissionStep<'a> {
    /// A structure whose field layout can now be assigned.
    Layout {
        name: &'a str,
        structure: &'a StructureType,
    },
    /// A name that re-exports another declaration.
    Alias {
        name: &'a str,
        target: &'a NamedTypeRef,
    },
    /// A structure without members; its class is already complete.
    Empty { name: &'a str },
}

impl<'a> EmissionStep<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            EmissionStep::Layout { name, .. } => name,
            EmissionStep::Alias { name, .. } => name,
            EmissionStep::Empty { name } => name,
        }
    }
}

/// Orders structure layouts so a structure is laid out only after every structure
/// it contains by value.
///
/// Aliases are emitted ahead of every layout, since a pointer or callback member
/// may name one. Structures are then resolved in passes over the pending
/// candidates. A structure that still waits on an unfinished dependency is
/// deferred to the next pass; a pass that finishes nothing means the remaining
/// candidates form (or wait on) a cycle.
pub struct StructureResolver<'a> {
    types: &'a IndexMap<QualifiedName, TypeDescriptor>,
}

impl<'a> StructureResolver<'a> {
    pub fn new(model: &'a ParsedResult) -> Self {
        Self { types: &model.types }
    }

    /// Single-segment structures and aliases, in declaration order.
    pub fn candidates(&self) -> IndexSet<&'a QualifiedName> {
        self.types
            .iter()
            .filter(|(name, ty)| {
                name.single().is_some()
                    && matches!(ty, TypeDescriptor::Structure(_) | TypeDescriptor::NamedTypeReference(_))
            })
            .map(|(name, _)| name)
            .collect()
    }

    pub fn resolve(&self) -> Result<Vec<EmissionStep<'a>>, GenError> {
        let candidates = self.candidates();
        let mut pending = IndexSet::with_capacity(candidates.len());
        let mut finished: HashSet<&'a QualifiedName> = HashSet::new();
        let mut order = Vec::with_capacity(candidates.len());
        let mut pass = 0usize;

        for &name in &candidates {
            match (name.single(), self.lookup(name, name)?) {
                (Some(bare), TypeDescriptor::NamedTypeReference(target)) => {
                    order.push(EmissionStep::Alias { name: bare, target });
                    finished.insert(name);
                }
                _ => {
                    pending.insert(name);
                }
            }
        }

        while !pending.is_empty() {
            pass += 1;
            let current = std::mem::take(&mut pending);
            let mut processed_some = false;

            for name in current {
                let Some(step) = self.try_finish(name, &candidates, &finished)? else {
                    /* Waits on a structure that is not laid out yet */
                    pending.insert(name);
                    continue;
                };
                order.push(step);
                finished.insert(name);
                processed_some = true;
            }

            debug!(
                "structure pass {}: {} finished, {} pending",
                pass,
                finished.len(),
                pending.len()
            );

            if !processed_some {
                return Err(GenError::DependencyCycle {
                    pending: pending.iter().map(|name| name.to_string()).collect(),
                });
            }
        }

        Ok(order)
    }

    fn try_finish(
        &self,
        name: &'a QualifiedName,
        candidates: &IndexSet<&'a QualifiedName>,
        finished: &HashSet<&'a QualifiedName>,
    ) -> Result<Option<EmissionStep<'a>>, GenError> {
        let Some(bare) = name.single() else {
            return Ok(None);
        };

        match self.lookup(name, name)? {
            TypeDescriptor::NamedTypeReference(target) => Ok(Some(EmissionStep::Alias { name: bare, target })),
            TypeDescriptor::Structure(structure) if structure.members.is_empty() => {
                Ok(Some(EmissionStep::Empty { name: bare }))
            }
            TypeDescriptor::Structure(structure) => {
                for member in &structure.members {
                    if let Some(reference) = by_value_reference(&member.ty) {
                        if self.is_blocked(&reference.name, name, candidates, finished)? {
                            return Ok(None);
                        }
                    }
                }
                Ok(Some(EmissionStep::Layout { name: bare, structure }))
            }
            _ => Ok(None),
        }
    }

    /// Whether a by-value reference still waits on an unfinished candidate. Alias
    /// chains are followed so the structure at the end has to be finished as well.
    fn is_blocked(
        &self,
        reference: &'a QualifiedName,
        referrer: &QualifiedName,
        candidates: &IndexSet<&'a QualifiedName>,
        finished: &HashSet<&'a QualifiedName>,
    ) -> Result<bool, GenError> {
        let mut current = reference;
        let mut seen = HashSet::new();

        while seen.insert(current) {
            let target = self.lookup(current, referrer)?;
            let is_layout_candidate = matches!(
                target,
                TypeDescriptor::Structure(_) | TypeDescriptor::NamedTypeReference(_)
            ) && candidates.contains(current);

            if is_layout_candidate && !finished.contains(current) {
                return Ok(true);
            }

            match target {
                TypeDescriptor::NamedTypeReference(next) => current = &next.name,
                _ => break,
            }
        }

        Ok(false)
    }

    fn lookup(&self, name: &QualifiedName, referrer: &QualifiedName) -> Result<&'a TypeDescriptor, GenError> {
        self.types.get(name).ok_or_else(|| GenError::UnresolvedType {
            name: name.to_string(),
            referrer: referrer.to_string(),
        })
    }
}

/// The named type a member embeds by value, directly or as an array element.
fn by_value_reference(ty: &TypeDescriptor) -> Option<&NamedTypeRef> {
    match ty {
        TypeDescriptor::NamedTypeReference(named) => Some(named),
        TypeDescriptor::Array { element, .. } => by_value_reference(element),
        _ => None,
    }
}

// Include comprehensive tests
#[cfg(test)]
#[path = "dependency_tests.rs"]
mod dependency_tests;
