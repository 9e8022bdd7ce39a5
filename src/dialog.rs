//! Component parameter dialogs, independent of how they are drawn.
//!
//! A [`DialogManager`] opens at most one dialog at a time. The slot is held
//! by a [`FlightGuard`] that lives inside the open session, so closing the
//! dialog any way at all (apply, cancel, a failed construction) frees it.

use crate::components::ComponentKind;
use crate::schema::{self, FieldSpec, FieldType, ParamValue, ParamValues, Tab, ValidationError};
use crate::style;
use crate::types::{Cell, CellId, CellValue, Diagram};
use std::rc::Rc;
use thiserror::Error;

/// Why a dialog could not be opened for a cell.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DialogError {
    /// No cell with this id
    #[error("cell {0} does not exist")]
    MissingCell(CellId),

    /// Cell style names no component
    #[error("cell {0} has no component tag")]
    NoComponentTag(CellId),

    /// Cell carries a tag no dialog exists for
    #[error("cell {cell} has unknown component tag {tag:?}")]
    UnknownTag {
        /// Cell id
        cell: CellId,
        /// Tag as written in the style
        tag: String,
    },
}

/// Shared busy flag allowing one holder at a time.
#[derive(Debug, Clone, Default)]
pub struct SingleFlight {
    busy: Rc<std::cell::Cell<bool>>,
}

impl SingleFlight {
    /// Takes the slot, or `None` if it is already held.
    pub fn try_acquire(&self) -> Option<FlightGuard> {
        if self.busy.replace(true) {
            return None;
        }
        Some(FlightGuard {
            busy: Rc::clone(&self.busy),
        })
    }

    /// Whether a guard currently holds the slot.
    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }
}

/// Releases its [`SingleFlight`] slot when dropped.
#[derive(Debug)]
pub struct FlightGuard {
    busy: Rc<std::cell::Cell<bool>>,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.busy.set(false);
    }
}

/// Resolves which parameter table a cell's dialog shows.
pub fn dialog_kind(cell: &Cell) -> Result<ComponentKind, DialogError> {
    let parsed = style::parse_style(&cell.style);
    let Some(tag) = style::component_tag(&parsed) else {
        return Err(DialogError::NoComponentTag(cell.id.clone()));
    };
    let kind = ComponentKind::from_tag(tag).ok_or_else(|| DialogError::UnknownTag {
        cell: cell.id.clone(),
        tag: tag.to_string(),
    })?;
    Ok(kind)
}

/// Text buffers behind one open dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    /// Component being edited
    pub kind: ComponentKind,
    /// Display name buffer
    pub name: String,
    buffers: Vec<String>,
    /// Tab currently shown
    pub active_tab: Tab,
    errors: Vec<ValidationError>,
}

impl FormState {
    /// Seeds every field from the cell's attributes, or the field default.
    pub fn new(kind: ComponentKind, cell: &Cell) -> Self {
        let attributes = cell.attributes();
        let buffers = schema::fields(kind)
            .iter()
            .map(|spec| {
                attributes
                    .and_then(|bag| bag.get(spec.id))
                    .unwrap_or(spec.default)
                    .to_string()
            })
            .collect();
        Self {
            kind,
            name: cell.label().to_string(),
            buffers,
            active_tab: Tab::LoadFlow,
            errors: Vec::new(),
        }
    }

    /// Parameters of the edited kind, in schema order.
    pub fn fields(&self) -> &'static [FieldSpec] {
        schema::fields(self.kind)
    }

    /// Tabs that have at least one field.
    pub fn tabs(&self) -> Vec<Tab> {
        schema::tabs(self.kind)
    }

    /// Current text of a field.
    pub fn buffer(&self, id: &str) -> Option<&str> {
        let index = self.fields().iter().position(|spec| spec.id == id)?;
        self.buffers.get(index).map(String::as_str)
    }

    /// Replaces the text of a field. Returns false for unknown ids.
    pub fn set(&mut self, id: &str, value: impl Into<String>) -> bool {
        match self.fields().iter().position(|spec| spec.id == id) {
            Some(index) => {
                self.buffers[index] = value.into();
                true
            }
            None => false,
        }
    }

    /// Fields on `tab` with their editable buffers.
    pub fn tab_entries_mut(
        &mut self,
        tab: Tab,
    ) -> impl Iterator<Item = (&'static FieldSpec, &mut String)> {
        schema::fields(self.kind)
            .iter()
            .zip(self.buffers.iter_mut())
            .filter(move |(spec, _)| spec.tab == tab)
    }

    /// Error recorded for a field by the last failed apply.
    pub fn error_for(&self, id: &str) -> Option<&ValidationError> {
        self.errors.iter().find(|err| err.field == id)
    }

    /// Errors from the last failed apply.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Parses every buffer into typed values.
    ///
    /// Blank optional fields are left out; all failures are reported, not
    /// just the first.
    pub fn validate(&self) -> Result<ParamValues, Vec<ValidationError>> {
        let mut values = ParamValues::new();
        let mut errors = Vec::new();
        for (spec, raw) in self.fields().iter().zip(&self.buffers) {
            match ParamValue::parse(spec, raw) {
                Ok(Some(value)) => values.insert(spec.id, value),
                Ok(None) => {}
                Err(err) => errors.push(err),
            }
        }
        if errors.is_empty() {
            Ok(values)
        } else {
            Err(errors)
        }
    }
}

/// What an accepted dialog hands back to the editor.
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    /// Cell the dialog was opened for
    pub cell_id: CellId,
    /// Trimmed display name
    pub name: String,
    /// Parsed parameters; blank optionals are absent
    pub values: ParamValues,
}

impl Applied {
    /// Writes the name and values into the cell.
    ///
    /// Optional parameters left blank are removed from the bag so the
    /// payload omits them. Returns the value before and after, for undo.
    pub fn write_to(&self, diagram: &mut Diagram) -> Option<(Option<CellValue>, CellValue)> {
        let cell = diagram.cell_mut(&self.cell_id)?;
        let kind = dialog_kind(cell).ok()?;
        let before = cell.value.clone();
        let value = cell.value.get_or_insert_with(CellValue::default);
        value.label = self.name.trim().to_string();
        for spec in schema::fields(kind) {
            match self.values.get(spec.id) {
                Some(param) => value.attributes.set(spec.id, param.to_attr_string()),
                None => {
                    value.attributes.remove(spec.id);
                }
            }
        }
        Some((before, value.clone()))
    }
}

/// One open dialog and the slot it holds.
#[derive(Debug)]
pub struct DialogSession {
    /// Cell being edited
    pub cell_id: CellId,
    /// Input buffers
    pub form: FormState,
    _guard: FlightGuard,
}

/// Owns the single-flight slot and the session currently on screen.
#[derive(Debug, Default)]
pub struct DialogManager {
    flight: SingleFlight,
    session: Option<DialogSession>,
}

impl DialogManager {
    /// Creates a manager with no dialog open.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the dialog for `cell_id`.
    ///
    /// # Returns
    ///
    /// `Ok(true)` when a dialog was opened, `Ok(false)` when one is already
    /// showing, or the reason the dialog could not be built.
    pub fn open(&mut self, diagram: &Diagram, cell_id: &str) -> Result<bool, DialogError> {
        let Some(guard) = self.flight.try_acquire() else {
            log::debug!("dialog already open, ignoring request for {cell_id}");
            return Ok(false);
        };
        let cell = diagram
            .cell(cell_id)
            .ok_or_else(|| DialogError::MissingCell(cell_id.to_string()))?;
        let kind = dialog_kind(cell)?;
        self.session = Some(DialogSession {
            cell_id: cell.id.clone(),
            form: FormState::new(kind, cell),
            _guard: guard,
        });
        Ok(true)
    }

    /// Whether a dialog currently holds the slot.
    pub fn is_open(&self) -> bool {
        self.flight.is_busy()
    }

    /// The open session, if any.
    pub fn session(&self) -> Option<&DialogSession> {
        self.session.as_ref()
    }

    /// Mutable access to the open session.
    pub fn session_mut(&mut self) -> Option<&mut DialogSession> {
        self.session.as_mut()
    }

    /// Validates the open form.
    ///
    /// On success the dialog closes and its values are returned. On failure
    /// the errors are kept on the form and the dialog stays open.
    pub fn apply(&mut self) -> Option<Applied> {
        let session = self.session.as_mut()?;
        match session.form.validate() {
            Ok(values) => {
                let session = self.session.take()?;
                Some(Applied {
                    cell_id: session.cell_id,
                    name: session.form.name,
                    values,
                })
            }
            Err(errors) => {
                log::debug!("{} fields failed validation", errors.len());
                session.form.errors = errors;
                None
            }
        }
    }

    /// Closes the dialog without producing values.
    pub fn cancel(&mut self) {
        self.session = None;
    }

    /// Drops a dialog whose cell no longer exists.
    pub fn close_if_orphaned(&mut self, diagram: &Diagram) {
        if let Some(session) = &self.session {
            if diagram.cell(&session.cell_id).is_none() {
                self.cancel();
            }
        }
    }
}

/// Whether a checkbox buffer reads as set.
pub fn flag_is_set(spec: &FieldSpec, raw: &str) -> bool {
    spec.ty == FieldType::Bool && raw.trim().eq_ignore_ascii_case("true")
}
