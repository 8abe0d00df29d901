//! Human-readable network dumps.
//!
//! [`Network::dump`] renders an entity and its transitive dependencies as
//! an indented tree, one line per entity. Printing keeps its own done-set,
//! separate from any evaluation pass: a node already rendered is shown
//! once more as a `(repeat)` stub and not expanded, so dumps terminate on
//! cyclic networks.

use std::collections::HashSet;

use crate::error::NetworkError;
use crate::model::{EntityId, EntityKind};
use crate::network::Network;

impl Network {
    /// Indented dump of `root` and everything reachable from it.
    ///
    /// Each line shows the entity name, kind, id and current output slot
    /// (`output=?` when undefined, `(fixed)` when overridden). Dependency
    /// lines carry their role relative to the parent.
    pub fn dump(&self, root: EntityId) -> Result<String, NetworkError> {
        self.entity(root)?;
        let mut buf = String::new();
        let mut done = HashSet::new();
        self.dump_entity(&mut buf, root, 0, None, &mut done);
        Ok(buf)
    }

    fn dump_entity(
        &self,
        buf: &mut String,
        id: EntityId,
        depth: usize,
        role: Option<&str>,
        done: &mut HashSet<EntityId>,
    ) {
        let Ok(entity) = self.entity(id) else {
            return;
        };
        let indent = "  ".repeat(depth);
        let role = role.map(|r| format!("{r}: ")).unwrap_or_default();
        let header = format!("{}{}{} [{} {}]", indent, role, entity.name, entity.kind.label(), id);

        if !done.insert(id) {
            buf.push_str(&header);
            buf.push_str(" (repeat)\n");
            return;
        }

        let value = if entity.is_fixed() {
            format!("output={:.3} (fixed)", entity.output())
        } else if entity.has_output() {
            format!("output={:.3}", entity.output())
        } else {
            "output=?".to_string()
        };
        buf.push_str(&header);
        buf.push(' ');
        buf.push_str(&value);
        buf.push('\n');

        match &entity.kind {
            EntityKind::Molecule => {}
            EntityKind::Reaction {
                inputs,
                catalysts,
                regulators,
            } => {
                for &dep in inputs {
                    self.dump_entity(buf, dep, depth + 1, Some("input"), done);
                }
                for &dep in catalysts {
                    self.dump_entity(buf, dep, depth + 1, Some("catalyst"), done);
                }
                for &(dep, regulation) in regulators {
                    let label = format!("regulator({regulation})");
                    self.dump_entity(buf, dep, depth + 1, Some(&label), done);
                }
            }
            EntityKind::Complex { members } => {
                for (dep, multiplicity) in members.iter() {
                    let label = if multiplicity > 1 {
                        format!("member x{multiplicity}")
                    } else {
                        "member".to_string()
                    };
                    self.dump_entity(buf, dep, depth + 1, Some(&label), done);
                }
            }
            EntityKind::Pathway { events, .. } => {
                for (dep, multiplicity) in events.iter() {
                    let label = if multiplicity > 1 {
                        format!("event x{multiplicity}")
                    } else {
                        "event".to_string()
                    };
                    self.dump_entity(buf, dep, depth + 1, Some(&label), done);
                }
            }
        }
    }
}
