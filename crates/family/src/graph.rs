use crate::connectivity;
use crate::error::{DeletionRefused, RelationError, RemovalError};
use crate::person::{ParentRole, Person, PersonId};
use std::collections::HashMap;
use tracing::debug;

/// Registry owning every [`Person`] record and all relation links.
///
/// The registry is the sole owner of person storage; relations are id
/// references into it, so the cyclic parent/child/spouse/sibling structure
/// never forms ownership cycles. Insertion order is preserved and defines
/// the row order of derived relation matrices.
///
/// Every assignment validates its arguments fully before touching any
/// record: on error the graph is exactly as it was. After a successful
/// assignment both endpoints are reconciled (see [`FamilyGraph::reconcile`]).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FamilyGraph {
    order: Vec<PersonId>,
    people: HashMap<PersonId, Person>,
}

fn push_unique(list: &mut Vec<PersonId>, id: PersonId) {
    if !list.contains(&id) {
        list.push(id);
    }
}

fn same_children_set(a: &[PersonId], b: &[PersonId]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut x = a.to_vec();
    let mut y = b.to_vec();
    x.sort_unstable();
    y.sort_unstable();
    x == y
}

impl FamilyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: PersonId) -> bool {
        self.people.contains_key(&id)
    }

    pub fn get(&self, id: PersonId) -> Option<&Person> {
        self.people.get(&id)
    }

    /// Ids in insertion order.
    pub fn ids(&self) -> &[PersonId] {
        &self.order
    }

    /// Records in insertion order.
    pub fn people(&self) -> impl Iterator<Item = &Person> {
        self.order.iter().map(|id| &self.people[id])
    }

    /// Register a new person. The id must be unused.
    pub fn add_person(&mut self, person: Person) -> Result<(), RelationError> {
        if self.people.contains_key(&person.id()) {
            return Err(RelationError::DuplicatePerson(person.id()));
        }
        self.order.push(person.id());
        self.people.insert(person.id(), person);
        Ok(())
    }

    /// Assign `father` as the father of `child` and record the back link.
    pub fn assign_father(&mut self, child: PersonId, father: PersonId) -> Result<(), RelationError> {
        self.check_pair(child, father)?;
        if let Some(current) = self.people[&child].father {
            if current != father {
                return Err(RelationError::FatherAlreadyAssigned {
                    id: child,
                    name: self.people[&child].name().to_string(),
                });
            }
        }
        self.check_ancestry(father, child)?;

        self.record_mut(child).father = Some(father);
        push_unique(&mut self.record_mut(father).children, child);
        self.reconcile_valid(child);
        self.reconcile_valid(father);
        Ok(())
    }

    /// Assign `mother` as the mother of `child` and record the back link.
    pub fn assign_mother(&mut self, child: PersonId, mother: PersonId) -> Result<(), RelationError> {
        self.check_pair(child, mother)?;
        if let Some(current) = self.people[&child].mother {
            if current != mother {
                return Err(RelationError::MotherAlreadyAssigned {
                    id: child,
                    name: self.people[&child].name().to_string(),
                });
            }
        }
        self.check_ancestry(mother, child)?;

        self.record_mut(child).mother = Some(mother);
        push_unique(&mut self.record_mut(mother).children, child);
        self.reconcile_valid(child);
        self.reconcile_valid(mother);
        Ok(())
    }

    /// Attach `child` under `father`, entering the relation from the
    /// parent's side. Fails if `father` already acts as a mother.
    pub fn assign_child_via_father(
        &mut self,
        father: PersonId,
        child: PersonId,
    ) -> Result<(), RelationError> {
        self.check_pair(father, child)?;
        self.check_parent_role(father, ParentRole::Father)?;
        if let Some(current) = self.people[&child].father {
            if current != father {
                return Err(RelationError::FatherAlreadyAssigned {
                    id: child,
                    name: self.people[&child].name().to_string(),
                });
            }
        }
        self.check_ancestry(father, child)?;

        self.record_mut(child).father = Some(father);
        push_unique(&mut self.record_mut(father).children, child);
        self.reconcile_valid(child);
        self.reconcile_valid(father);
        Ok(())
    }

    /// Attach `child` under `mother`, entering the relation from the
    /// parent's side. Fails if `mother` already acts as a father.
    pub fn assign_child_via_mother(
        &mut self,
        mother: PersonId,
        child: PersonId,
    ) -> Result<(), RelationError> {
        self.check_pair(mother, child)?;
        self.check_parent_role(mother, ParentRole::Mother)?;
        if let Some(current) = self.people[&child].mother {
            if current != mother {
                return Err(RelationError::MotherAlreadyAssigned {
                    id: child,
                    name: self.people[&child].name().to_string(),
                });
            }
        }
        self.check_ancestry(mother, child)?;

        self.record_mut(child).mother = Some(mother);
        push_unique(&mut self.record_mut(mother).children, child);
        self.reconcile_valid(child);
        self.reconcile_valid(mother);
        Ok(())
    }

    /// Link two persons as mutual spouses.
    pub fn assign_spouse(&mut self, a: PersonId, b: PersonId) -> Result<(), RelationError> {
        self.check_pair(a, b)?;
        for (this, other) in [(a, b), (b, a)] {
            if let Some(current) = self.people[&this].spouse {
                if current != other {
                    return Err(RelationError::SpouseAlreadyAssigned {
                        id: this,
                        name: self.people[&this].name().to_string(),
                    });
                }
            }
        }

        self.record_mut(a).spouse = Some(b);
        self.record_mut(b).spouse = Some(a);
        self.reconcile_valid(a);
        self.reconcile_valid(b);
        Ok(())
    }

    /// Link two persons as siblings, symmetrically. Repeating an existing
    /// sibling link is a no-op.
    pub fn assign_sibling(&mut self, a: PersonId, b: PersonId) -> Result<(), RelationError> {
        self.check_pair(a, b)?;
        push_unique(&mut self.record_mut(a).siblings, b);
        push_unique(&mut self.record_mut(b).siblings, a);
        self.reconcile_valid(a);
        self.reconcile_valid(b);
        Ok(())
    }

    /// Converge the relations around one person.
    ///
    /// Runs automatically after every assignment; exposed for callers
    /// replaying imported records. Idempotent: a second invocation on an
    /// already-converged person changes nothing.
    pub fn reconcile(&mut self, id: PersonId) -> Result<(), RelationError> {
        self.existing(id)?;
        self.reconcile_valid(id);
        Ok(())
    }

    /// Pair up persons whose non-empty children sets are identical and who
    /// both lack a spouse. Returns the number of couples linked.
    ///
    /// This is the inference counterpart of explicit [`assign_spouse`]
    /// calls; it is never run implicitly.
    ///
    /// [`assign_spouse`]: FamilyGraph::assign_spouse
    pub fn infer_spouses(&mut self) -> usize {
        let ids = self.order.clone();
        let mut linked = 0;
        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                if self.people[&a].spouse.is_some() || self.people[&b].spouse.is_some() {
                    continue;
                }
                if self.people[&a].children.is_empty() || self.people[&b].children.is_empty() {
                    continue;
                }
                if !same_children_set(&self.people[&a].children, &self.people[&b].children) {
                    continue;
                }
                debug!(first = %a, second = %b, "inferred spouses from shared children");
                self.record_mut(a).spouse = Some(b);
                self.record_mut(b).spouse = Some(a);
                self.reconcile_valid(a);
                self.reconcile_valid(b);
                linked += 1;
            }
        }
        linked
    }

    /// All descendants of a person, preorder, each listed once.
    pub fn descendants(&self, id: PersonId) -> Result<Vec<PersonId>, RelationError> {
        self.existing(id)?;
        Ok(self.collect_descendants(id))
    }

    /// Other children of the person's father and mother, in encounter order.
    pub fn siblings_via_parents(&self, id: PersonId) -> Result<Vec<PersonId>, RelationError> {
        let person = self.existing(id)?;
        let mut out = Vec::new();
        for parent in [person.father, person.mother].into_iter().flatten() {
            for &c in &self.people[&parent].children {
                if c != id {
                    push_unique(&mut out, c);
                }
            }
        }
        Ok(out)
    }

    /// Remove a person, severing every inbound and outbound link first.
    ///
    /// Refused when the person is a cut vertex of the undirected family
    /// graph, since removal would leave the family in disconnected parts.
    pub fn remove_person(&mut self, id: PersonId) -> Result<Person, RemovalError> {
        let name = self.existing(id)?.name().to_string();
        if connectivity::is_bridge(self, id)? {
            return Err(DeletionRefused { id, name }.into());
        }
        debug!(person = %id, "removing person from the registry");

        let snapshot = self.people[&id].clone();
        if let Some(f) = snapshot.father {
            self.record_mut(f).children.retain(|&c| c != id);
        }
        if let Some(m) = snapshot.mother {
            self.record_mut(m).children.retain(|&c| c != id);
        }
        if let Some(sp) = snapshot.spouse {
            self.record_mut(sp).spouse = None;
        }
        for &c in &snapshot.children {
            let child = self.record_mut(c);
            if child.father == Some(id) {
                child.father = None;
            }
            if child.mother == Some(id) {
                child.mother = None;
            }
        }
        for &s in &snapshot.siblings {
            self.record_mut(s).siblings.retain(|&x| x != id);
        }

        self.order.retain(|&x| x != id);
        let removed = self
            .people
            .remove(&id)
            .ok_or(RelationError::UnknownPerson(id))?;
        Ok(removed)
    }

    // ---- internals ----

    fn existing(&self, id: PersonId) -> Result<&Person, RelationError> {
        self.people.get(&id).ok_or(RelationError::UnknownPerson(id))
    }

    fn record_mut(&mut self, id: PersonId) -> &mut Person {
        self.people
            .get_mut(&id)
            .expect("relation ids are validated before mutation")
    }

    fn check_pair(&self, a: PersonId, b: PersonId) -> Result<(), RelationError> {
        let first = self.existing(a)?;
        self.existing(b)?;
        if a == b {
            return Err(RelationError::SelfRelation {
                id: a,
                name: first.name().to_string(),
            });
        }
        Ok(())
    }

    fn check_parent_role(&self, parent: PersonId, requested: ParentRole) -> Result<(), RelationError> {
        let Some(&reference) = self.people[&parent].children.first() else {
            return Ok(());
        };
        let actual = if self.people[&reference].father == Some(parent) {
            ParentRole::Father
        } else if self.people[&reference].mother == Some(parent) {
            ParentRole::Mother
        } else {
            return Ok(());
        };
        if actual != requested {
            return Err(RelationError::ParentRoleConflict {
                id: parent,
                name: self.people[&parent].name().to_string(),
                actual,
                requested,
            });
        }
        Ok(())
    }

    // The row relaxation of the layout engine terminates only when the
    // parent orientation is acyclic, so cycles are refused here.
    fn check_ancestry(&self, parent: PersonId, child: PersonId) -> Result<(), RelationError> {
        if self.collect_descendants(child).contains(&parent) {
            return Err(RelationError::AncestryCycle {
                parent: self.people[&parent].name().to_string(),
                child: self.people[&child].name().to_string(),
            });
        }
        Ok(())
    }

    fn collect_descendants(&self, id: PersonId) -> Vec<PersonId> {
        let mut out = Vec::new();
        let mut stack: Vec<PersonId> = self.people[&id].children.clone();
        while let Some(c) = stack.pop() {
            if out.contains(&c) {
                continue;
            }
            out.push(c);
            stack.extend(self.people[&c].children.iter().copied());
        }
        out
    }

    fn reconcile_valid(&mut self, id: PersonId) {
        debug!(person = %id, "reconciling relations");
        self.link_parents_as_spouses(id);
        self.link_siblings(id);
        self.link_siblings_to_parents(id);
        self.link_children_to_spouse(id);
    }

    /// Step 1: two known parents become mutual spouses, unless either
    /// already has a different one.
    fn link_parents_as_spouses(&mut self, id: PersonId) {
        let person = &self.people[&id];
        let (Some(f), Some(m)) = (person.father, person.mother) else {
            return;
        };
        let f_free = self.people[&f].spouse.map_or(true, |s| s == m);
        let m_free = self.people[&m].spouse.map_or(true, |s| s == f);
        if f_free && m_free {
            self.record_mut(f).spouse = Some(m);
            self.record_mut(m).spouse = Some(f);
        }
    }

    /// Step 2: union the sibling set with the parents' other children, or
    /// with an already-known sibling's set when no parent is recorded.
    fn link_siblings(&mut self, id: PersonId) {
        let person = &self.people[&id];
        let mut source = match (person.father, person.mother) {
            (Some(f), _) => self.people[&f].children.clone(),
            (None, Some(m)) => self.people[&m].children.clone(),
            (None, None) => Vec::new(),
        };
        if source.is_empty() {
            if let Some(&first) = person.siblings.first() {
                source = self.people[&first].siblings.clone();
            }
        }
        for s in source {
            if s == id {
                continue;
            }
            push_unique(&mut self.record_mut(id).siblings, s);
            push_unique(&mut self.record_mut(s).siblings, id);
        }
    }

    /// Step 3: siblings lacking a parent inherit this person's. A sibling
    /// that already has the parent among its descendants is skipped: a
    /// cross-generation sibling link must not turn into a parent cycle.
    fn link_siblings_to_parents(&mut self, id: PersonId) {
        let person = &self.people[&id];
        let (father, mother) = (person.father, person.mother);
        let siblings = person.siblings.clone();
        if let Some(f) = father {
            for &s in &siblings {
                if s == f {
                    continue;
                }
                if self.people[&s].father.is_none() && !self.collect_descendants(s).contains(&f) {
                    self.record_mut(s).father = Some(f);
                }
                if self.people[&s].father == Some(f) {
                    push_unique(&mut self.record_mut(f).children, s);
                }
            }
        }
        if let Some(m) = mother {
            for &s in &siblings {
                if s == m {
                    continue;
                }
                if self.people[&s].mother.is_none() && !self.collect_descendants(s).contains(&m) {
                    self.record_mut(s).mother = Some(m);
                }
                if self.people[&s].mother == Some(m) {
                    push_unique(&mut self.record_mut(m).children, s);
                }
            }
        }
    }

    /// Step 4: a spouse shares the children and fills their missing
    /// parent slot.
    fn link_children_to_spouse(&mut self, id: PersonId) {
        let person = &self.people[&id];
        let Some(sp) = person.spouse else {
            return;
        };
        let Some(&reference) = person.children.first() else {
            return;
        };
        let role = if self.people[&reference].father == Some(id) {
            ParentRole::Father
        } else if self.people[&reference].mother == Some(id) {
            ParentRole::Mother
        } else {
            return;
        };
        let children = person.children.clone();
        for c in children {
            if c == sp {
                continue;
            }
            let slot = match role {
                ParentRole::Father => self.people[&c].mother,
                ParentRole::Mother => self.people[&c].father,
            };
            match slot {
                None => {
                    match role {
                        ParentRole::Father => self.record_mut(c).mother = Some(sp),
                        ParentRole::Mother => self.record_mut(c).father = Some(sp),
                    }
                    push_unique(&mut self.record_mut(sp).children, c);
                }
                Some(existing) if existing == sp => {
                    push_unique(&mut self.record_mut(sp).children, c);
                }
                Some(_) => {}
            }
        }
    }
}
