//! Undo/redo of edits to the diagram.
//!
//! Every action stores enough to be reversed; reversing an action yields
//! the action that re-applies it, so one routine serves both directions.

use crate::constants::MAX_UNDO_HISTORY;
use crate::types::*;
use serde::{Deserialize, Serialize};

/// Represents different types of actions that can be undone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UndoAction {
    /// One or more vertices were dragged
    CellsMoved {
        moves: Vec<(CellId, (f32, f32), (f32, f32))>,
    },
    /// Cells were added (a placed component, a drawn edge, a pasted sample)
    CellsCreated { cell_ids: Vec<CellId> },
    /// Cells were removed, with the indices they held
    CellsDeleted { removed: Vec<(usize, Cell)> },
    /// A dialog applied new parameters
    ValueChanged {
        cell_id: CellId,
        old_value: Option<CellValue>,
        new_value: Option<CellValue>,
    },
    /// The display name was edited in the properties panel
    CellRenamed {
        cell_id: CellId,
        old_name: String,
        new_name: String,
    },
}

/// Manages undo/redo history for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UndoHistory {
    #[serde(skip)]
    undo_stack: Vec<UndoAction>,
    #[serde(skip)]
    redo_stack: Vec<UndoAction>,
}

impl UndoHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an action. A new action invalidates everything redoable.
    pub fn push_action(&mut self, action: UndoAction) {
        self.undo_stack.push(action);
        self.redo_stack.clear();

        if self.undo_stack.len() > MAX_UNDO_HISTORY {
            self.undo_stack.remove(0);
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn pop_undo(&mut self) -> Option<UndoAction> {
        self.undo_stack.pop()
    }

    pub fn pop_redo(&mut self) -> Option<UndoAction> {
        self.redo_stack.pop()
    }

    pub fn push_redo(&mut self, action: UndoAction) {
        self.redo_stack.push(action);
    }

    /// Puts a redone action back without clearing the redo stack.
    pub fn push_undo(&mut self, action: UndoAction) {
        self.undo_stack.push(action);
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

/// Reversible application of [`UndoAction`]s.
pub trait UndoableDiagram {
    /// Reverts `action`, returning the action that re-applies it.
    fn revert(&mut self, action: &UndoAction) -> Option<UndoAction>;
}

impl UndoableDiagram for Diagram {
    fn revert(&mut self, action: &UndoAction) -> Option<UndoAction> {
        match action {
            UndoAction::CellsMoved { moves } => {
                let mut reversed = Vec::with_capacity(moves.len());
                for (cell_id, old_position, new_position) in moves {
                    if let Some(geometry) = self.cell_mut(cell_id).and_then(Cell::geometry_mut) {
                        geometry.x = old_position.0;
                        geometry.y = old_position.1;
                        reversed.push((cell_id.clone(), *new_position, *old_position));
                    }
                }
                (!reversed.is_empty()).then_some(UndoAction::CellsMoved { moves: reversed })
            }
            UndoAction::CellsCreated { cell_ids } => {
                let removed = self.remove_cells(cell_ids);
                (!removed.is_empty()).then_some(UndoAction::CellsDeleted { removed })
            }
            UndoAction::CellsDeleted { removed } => {
                self.restore_cells(removed);
                Some(UndoAction::CellsCreated {
                    cell_ids: removed.iter().map(|(_, cell)| cell.id.clone()).collect(),
                })
            }
            UndoAction::ValueChanged {
                cell_id,
                old_value,
                new_value,
            } => {
                let cell = self.cell_mut(cell_id)?;
                cell.value = old_value.clone();
                Some(UndoAction::ValueChanged {
                    cell_id: cell_id.clone(),
                    old_value: new_value.clone(),
                    new_value: old_value.clone(),
                })
            }
            UndoAction::CellRenamed {
                cell_id,
                old_name,
                new_name,
            } => {
                let cell = self.cell_mut(cell_id)?;
                cell.value.get_or_insert_with(CellValue::default).label = old_name.clone();
                Some(UndoAction::CellRenamed {
                    cell_id: cell_id.clone(),
                    old_name: new_name.clone(),
                    new_name: old_name.clone(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ComponentKind;

    fn sample() -> Diagram {
        let mut diagram = Diagram::new();
        diagram.add_cell(Cell::component(ComponentKind::Bus, "B1", (0.0, 0.0)).with_id("b1"));
        diagram.add_cell(Cell::component(ComponentKind::Load, "L1", (0.0, 80.0)).with_id("l1"));
        diagram.connect("shapeELXXX=NotEditableLine", "l1", "b1").unwrap();
        diagram
    }

    #[test]
    fn delete_then_undo_then_redo() {
        let mut diagram = sample();
        let before = diagram.clone();
        let removed = diagram.remove_cell("b1");
        let action = UndoAction::CellsDeleted { removed };

        let redo = diagram.revert(&action).unwrap();
        assert_eq!(diagram, before);

        let undo_again = diagram.revert(&redo).unwrap();
        assert_eq!(diagram.cells.len(), 1);
        assert!(matches!(undo_again, UndoAction::CellsDeleted { .. }));
    }

    #[test]
    fn moves_reverse_and_swap() {
        let mut diagram = sample();
        diagram.cell_mut("l1").unwrap().geometry_mut().unwrap().x = 40.0;
        let action = UndoAction::CellsMoved {
            moves: vec![("l1".into(), (0.0, 80.0), (40.0, 80.0))],
        };
        let redo = diagram.revert(&action).unwrap();
        assert_eq!(diagram.cell("l1").unwrap().geometry().unwrap().x, 0.0);
        assert_eq!(
            redo,
            UndoAction::CellsMoved {
                moves: vec![("l1".into(), (40.0, 80.0), (0.0, 80.0))],
            }
        );
    }

    #[test]
    fn value_and_name_changes_revert() {
        let mut diagram = sample();
        let old_value = diagram.cell("l1").unwrap().value.clone();
        let cell = diagram.cell_mut("l1").unwrap();
        cell.value.as_mut().unwrap().attributes.set("p_mw", "3");
        let new_value = cell.value.clone();

        diagram
            .revert(&UndoAction::ValueChanged {
                cell_id: "l1".into(),
                old_value,
                new_value,
            })
            .unwrap();
        assert!(!diagram.cell("l1").unwrap().attributes().unwrap().contains("p_mw"));

        diagram
            .revert(&UndoAction::CellRenamed {
                cell_id: "l1".into(),
                old_name: "Old".into(),
                new_name: "L1".into(),
            })
            .unwrap();
        assert_eq!(diagram.cell("l1").unwrap().label(), "Old");
    }

    #[test]
    fn reverting_missing_cells_is_none() {
        let mut diagram = Diagram::new();
        assert!(diagram
            .revert(&UndoAction::CellsCreated {
                cell_ids: vec!["ghost".into()]
            })
            .is_none());
    }

    #[test]
    fn history_is_bounded_and_new_actions_clear_redo() {
        let mut history = UndoHistory::new();
        for n in 0..(MAX_UNDO_HISTORY + 5) {
            history.push_action(UndoAction::CellsCreated {
                cell_ids: vec![n.to_string()],
            });
        }
        let mut count = 0;
        while history.pop_undo().is_some() {
            count += 1;
        }
        assert_eq!(count, MAX_UNDO_HISTORY);

        history.push_redo(UndoAction::CellsCreated { cell_ids: vec![] });
        assert!(history.can_redo());
        history.push_action(UndoAction::CellsCreated { cell_ids: vec![] });
        assert!(!history.can_redo());
    }
}
