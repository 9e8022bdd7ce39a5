use super::*;
use crate::components::ComponentKind;
use crate::examples::ExampleKind;
use crate::types::{Cell, CellValue};
use eframe::egui;

fn screen() -> egui::Rect {
    egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(1200.0, 800.0))
}

/// Raw input for one frame. Held modifiers are taken from the events,
/// since `InputState::modifiers` reads them from the raw input.
fn raw_input(events: Vec<egui::Event>) -> egui::RawInput {
    let mut raw = egui::RawInput::default();
    raw.screen_rect = Some(screen());
    raw.modifiers = events
        .iter()
        .filter_map(|event| match event {
            egui::Event::Key { modifiers, .. } | egui::Event::PointerButton { modifiers, .. } => {
                Some(*modifiers)
            }
            _ => None,
        })
        .last()
        .unwrap_or_default();
    raw.events = events;
    raw
}

/// Run a single headless egui frame with the provided input events and closure.
fn run_ui_with(events: Vec<egui::Event>, mut f: impl FnMut(&egui::Context)) -> egui::FullOutput {
    let raw = raw_input(events);

    let ctx = egui::Context::default();
    ctx.run(raw, |ctx| {
        ctx.set_visuals(egui::Visuals::dark());
        f(ctx);
    })
}

/// Runs one canvas frame on a shared context so pointer state carries over.
fn canvas_frame(ctx: &egui::Context, app: &mut GridSketchApp, events: Vec<egui::Event>) {
    let _ = ctx.run(raw_input(events), |ctx| {
        ctx.set_visuals(egui::Visuals::dark());
        egui::CentralPanel::default().show(ctx, |ui| {
            app.draw_canvas(ui);
        });
    });
}

fn press(pos: egui::Pos2, modifiers: egui::Modifiers) -> Vec<egui::Event> {
    vec![
        egui::Event::PointerMoved(pos),
        egui::Event::PointerButton {
            pos,
            button: egui::PointerButton::Primary,
            pressed: true,
            modifiers,
        },
    ]
}

fn release(pos: egui::Pos2, modifiers: egui::Modifiers) -> Vec<egui::Event> {
    vec![
        egui::Event::PointerMoved(pos),
        egui::Event::PointerButton {
            pos,
            button: egui::PointerButton::Primary,
            pressed: false,
            modifiers,
        },
    ]
}

fn key(key: egui::Key, modifiers: egui::Modifiers) -> egui::Event {
    egui::Event::Key {
        key,
        physical_key: Some(key),
        pressed: true,
        repeat: false,
        modifiers,
    }
}

/// App with a fixed view where screen and world coordinates coincide.
fn app_with_identity_view() -> GridSketchApp {
    let mut app = GridSketchApp::default();
    app.canvas.offset = egui::Vec2::ZERO;
    app.canvas.zoom_factor = 1.0;
    app
}

#[test]
fn undo_operation_removes_last_created_cell() {
    let mut app = app_with_identity_view();
    app.context_menu.world_pos = (100.0, 100.0);

    let created_id = app.create_cell_at_pos(ComponentKind::Load);
    assert_eq!(app.interaction.selected_cells, vec![created_id.clone()]);
    assert_eq!(app.interaction.editing_name.as_deref(), Some(created_id.as_str()));
    assert!(app.diagram.cell(&created_id).is_some());

    app.perform_undo();
    assert!(app.diagram.cell(&created_id).is_none());

    app.perform_redo();
    assert!(app.diagram.cell(&created_id).is_some());
}

#[test]
fn clicking_canvas_selects_cell() {
    let mut app = app_with_identity_view();
    let world_pos = (200.0_f32, 150.0_f32);
    let cell_id = app
        .diagram
        .add_cell(Cell::component(ComponentKind::Load, "L1", world_pos));
    let click_pos = egui::pos2(world_pos.0, world_pos.1);

    let ctx = egui::Context::default();
    canvas_frame(&ctx, &mut app, vec![egui::Event::PointerMoved(click_pos)]);
    canvas_frame(&ctx, &mut app, press(click_pos, egui::Modifiers::NONE));

    assert_eq!(app.interaction.selected_cell(), Some(&cell_id));
}

#[test]
fn marquee_selects_cells_inside_rectangle() {
    let mut app = app_with_identity_view();
    let inside = app
        .diagram
        .add_cell(Cell::component(ComponentKind::Load, "in", (300.0, 300.0)));
    let outside = app
        .diagram
        .add_cell(Cell::component(ComponentKind::Load, "out", (900.0, 600.0)));

    let start = egui::pos2(200.0, 200.0);
    let end = egui::pos2(400.0, 400.0);
    let ctx = egui::Context::default();
    canvas_frame(&ctx, &mut app, vec![egui::Event::PointerMoved(start)]);
    canvas_frame(&ctx, &mut app, press(start, egui::Modifiers::NONE));
    canvas_frame(&ctx, &mut app, vec![egui::Event::PointerMoved(end)]);
    assert!(app.interaction.marquee_start.is_some());
    canvas_frame(&ctx, &mut app, release(end, egui::Modifiers::NONE));

    assert!(app.interaction.marquee_start.is_none());
    assert!(app.interaction.selected_cells.contains(&inside));
    assert!(!app.interaction.selected_cells.contains(&outside));
}

#[test]
fn dragging_moves_cell_and_records_one_undo_step() {
    let mut app = app_with_identity_view();
    let cell_id = app
        .diagram
        .add_cell(Cell::component(ComponentKind::Load, "L1", (200.0, 200.0)));

    let ctx = egui::Context::default();
    let start = egui::pos2(200.0, 200.0);
    let end = egui::pos2(260.0, 230.0);
    canvas_frame(&ctx, &mut app, vec![egui::Event::PointerMoved(start)]);
    canvas_frame(&ctx, &mut app, press(start, egui::Modifiers::NONE));
    canvas_frame(&ctx, &mut app, vec![egui::Event::PointerMoved(end)]);
    canvas_frame(&ctx, &mut app, release(end, egui::Modifiers::NONE));

    let geometry = *app.diagram.cell(&cell_id).and_then(Cell::geometry).unwrap();
    assert_eq!((geometry.x, geometry.y), (260.0, 230.0));
    assert!(app.file.has_unsaved_changes);

    app.perform_undo();
    let geometry = *app.diagram.cell(&cell_id).and_then(Cell::geometry).unwrap();
    assert_eq!((geometry.x, geometry.y), (200.0, 200.0));
    assert!(!app.undo_history.can_undo());
}

#[test]
fn shift_drag_between_vertices_creates_connector() {
    let mut app = app_with_identity_view();
    let bus = app
        .diagram
        .add_cell(Cell::component(ComponentKind::Bus, "B1", (200.0, 200.0)));
    let load = app
        .diagram
        .add_cell(Cell::component(ComponentKind::Load, "L1", (200.0, 400.0)));

    let shift = egui::Modifiers {
        shift: true,
        ..Default::default()
    };
    let start = egui::pos2(200.0, 200.0);
    let end = egui::pos2(200.0, 400.0);
    let ctx = egui::Context::default();
    canvas_frame(&ctx, &mut app, vec![egui::Event::PointerMoved(start)]);
    canvas_frame(&ctx, &mut app, press(start, shift));
    canvas_frame(&ctx, &mut app, vec![egui::Event::PointerMoved(egui::pos2(200.0, 300.0))]);
    assert_eq!(app.interaction.drawing_edge_from.as_deref(), Some(bus.as_str()));
    assert!(app.interaction.pending_shift_from.is_none());
    canvas_frame(&ctx, &mut app, vec![egui::Event::PointerMoved(end)]);
    canvas_frame(&ctx, &mut app, release(end, shift));

    let edges: Vec<_> = app.diagram.edges().collect();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].terminals(), Some((Some(&bus), Some(&load))));
    assert!(edges[0].component_kind().is_none());
    assert!(app.undo_history.can_undo());
}

#[test]
fn line_tool_draws_component_edges() {
    let mut app = app_with_identity_view();
    app.interaction.edge_tool = EdgeTool::Component(ComponentKind::Line);
    let a = app
        .diagram
        .add_cell(Cell::component(ComponentKind::Bus, "B1", (200.0, 200.0)));
    let b = app
        .diagram
        .add_cell(Cell::component(ComponentKind::Bus, "B2", (600.0, 200.0)));

    let shift = egui::Modifiers {
        shift: true,
        ..Default::default()
    };
    let ctx = egui::Context::default();
    canvas_frame(&ctx, &mut app, vec![egui::Event::PointerMoved(egui::pos2(200.0, 200.0))]);
    canvas_frame(&ctx, &mut app, press(egui::pos2(200.0, 200.0), shift));
    canvas_frame(&ctx, &mut app, vec![egui::Event::PointerMoved(egui::pos2(400.0, 200.0))]);
    canvas_frame(&ctx, &mut app, vec![egui::Event::PointerMoved(egui::pos2(600.0, 200.0))]);
    canvas_frame(&ctx, &mut app, release(egui::pos2(600.0, 200.0), shift));

    let edge = app.diagram.edges().next().expect("edge drawn");
    assert_eq!(edge.component_kind(), Some(ComponentKind::Line));
    assert_eq!(edge.terminals(), Some((Some(&a), Some(&b))));

    let payload = crate::network::flatten(&app.diagram);
    let line = payload.of_kind(ComponentKind::Line).next().expect("line record");
    assert_eq!(line.bus("from_bus"), Some(a.as_str()));
    assert_eq!(line.bus("to_bus"), Some(b.as_str()));
}

#[test]
fn delete_key_removes_selection_with_incident_edges_and_undo_restores() {
    let mut app = app_with_identity_view();
    let bus = app
        .diagram
        .add_cell(Cell::component(ComponentKind::Bus, "B1", (0.0, 0.0)));
    let load = app
        .diagram
        .add_cell(Cell::component(ComponentKind::Load, "L1", (0.0, 100.0)));
    app.diagram
        .connect(&canvas::edge_style(crate::constants::NOT_EDITABLE_LINE), &bus, &load)
        .unwrap();
    let before = app.diagram.clone();
    app.interaction.selected_cells = vec![load.clone()];

    let _ = run_ui_with(vec![key(egui::Key::Delete, egui::Modifiers::NONE)], |ctx| {
        app.handle_delete_key(ctx);
    });

    assert!(app.diagram.cell(&load).is_none());
    assert_eq!(app.diagram.edges().count(), 0);
    assert!(app.interaction.selected_cells.is_empty());

    app.perform_undo();
    assert_eq!(app.diagram, before);
}

#[test]
fn ctrl_z_and_ctrl_y_walk_history() {
    let mut app = app_with_identity_view();
    app.context_menu.world_pos = (10.0, 10.0);
    let id = app.create_cell_at_pos(ComponentKind::Generator);
    app.interaction.editing_name = None;

    let command = egui::Modifiers {
        command: true,
        ..Default::default()
    };
    let _ = run_ui_with(vec![key(egui::Key::Z, command)], |ctx| {
        app.handle_undo_redo_keys(ctx);
    });
    assert!(app.diagram.cell(&id).is_none());

    let _ = run_ui_with(vec![key(egui::Key::Y, command)], |ctx| {
        app.handle_undo_redo_keys(ctx);
    });
    assert!(app.diagram.cell(&id).is_some());
}

/// Presses and releases twice at `pos` on a fresh context.
fn double_click_canvas(app: &mut GridSketchApp, pos: egui::Pos2) {
    let ctx = egui::Context::default();
    canvas_frame(&ctx, app, vec![egui::Event::PointerMoved(pos)]);
    for _ in 0..2 {
        canvas_frame(&ctx, app, press(pos, egui::Modifiers::NONE));
        canvas_frame(&ctx, app, release(pos, egui::Modifiers::NONE));
    }
}

#[test]
fn double_click_on_component_opens_its_dialog() {
    let mut app = app_with_identity_view();
    app.diagram
        .add_cell(Cell::component(ComponentKind::Load, "L1", (300.0, 300.0)));

    double_click_canvas(&mut app, egui::pos2(300.0, 300.0));

    let session = app.dialogs.session().expect("dialog open");
    assert_eq!(session.form.kind, ComponentKind::Load);
    assert!(app.alert.is_none());
}

#[test]
fn double_click_on_unknown_tag_shows_alert() {
    let mut app = app_with_identity_view();
    let mut cell = Cell::component(ComponentKind::Load, "R1", (300.0, 300.0));
    cell.style =
        crate::style::with_style_value(&cell.style, crate::constants::STYLE_TAG_KEY, "Result");
    let id = app.diagram.add_cell(cell);

    double_click_canvas(&mut app, egui::pos2(300.0, 300.0));

    assert!(!app.dialogs.is_open());
    let alert = app.alert.clone().expect("alert shown");
    assert!(alert.contains(&id), "{alert}");
    assert!(alert.contains("Result"), "{alert}");
}

#[test]
fn double_click_on_plain_connector_does_nothing() {
    let mut app = app_with_identity_view();
    let a = app
        .diagram
        .add_cell(Cell::component(ComponentKind::Bus, "B1", (200.0, 300.0)));
    let b = app
        .diagram
        .add_cell(Cell::component(ComponentKind::Bus, "B2", (600.0, 300.0)));
    app.diagram
        .connect(&canvas::edge_style(crate::constants::NOT_EDITABLE_LINE), &a, &b)
        .unwrap();

    double_click_canvas(&mut app, egui::pos2(400.0, 300.0));

    assert!(!app.dialogs.is_open());
    assert!(app.alert.is_none());
}

#[test]
fn second_dialog_request_is_ignored_while_one_is_open() {
    let mut app = app_with_identity_view();
    let load = app
        .diagram
        .add_cell(Cell::component(ComponentKind::Load, "L1", (0.0, 0.0)));
    let gen = app
        .diagram
        .add_cell(Cell::component(ComponentKind::Generator, "G1", (200.0, 0.0)));

    app.open_component_dialog(&load);
    app.open_component_dialog(&gen);

    let session = app.dialogs.session().expect("dialog open");
    assert_eq!(session.form.kind, ComponentKind::Load);
    assert!(app.alert.is_none());
}

#[test]
fn applying_dialog_writes_attributes_and_is_undoable() {
    let mut app = app_with_identity_view();
    let load = app
        .diagram
        .add_cell(Cell::component(ComponentKind::Load, "L1", (0.0, 0.0)));
    app.open_component_dialog(&load);
    {
        let form = &mut app.dialogs.session_mut().expect("dialog open").form;
        assert!(form.set("p_mw", "1.5"));
        form.name = "Feeder load".into();
    }
    app.commit_component_dialog();

    assert!(!app.dialogs.is_open());
    let cell = app.diagram.cell(&load).unwrap();
    assert_eq!(cell.label(), "Feeder load");
    assert_eq!(cell.attributes().and_then(|a| a.get("p_mw")), Some("1.5"));
    assert!(app.file.has_unsaved_changes);

    app.perform_undo();
    let cell = app.diagram.cell(&load).unwrap();
    assert_eq!(cell.label(), "L1");
    assert_eq!(cell.attributes().and_then(|a| a.get("p_mw")), None);
}

#[test]
fn invalid_dialog_input_keeps_dialog_open() {
    let mut app = app_with_identity_view();
    let load = app
        .diagram
        .add_cell(Cell::component(ComponentKind::Load, "L1", (0.0, 0.0)));
    app.open_component_dialog(&load);
    app.dialogs
        .session_mut()
        .expect("dialog open")
        .form
        .set("p_mw", "lots");
    app.commit_component_dialog();

    let session = app.dialogs.session().expect("still open");
    assert!(session.form.error_for("p_mw").is_some());
    assert_eq!(app.diagram.cell(&load).unwrap().attributes().and_then(|a| a.get("p_mw")), None);
    assert!(!app.undo_history.can_undo());
}

#[test]
fn component_dialog_renders_headless() {
    let mut app = app_with_identity_view();
    let trafo = app
        .diagram
        .add_cell(Cell::component(ComponentKind::Transformer, "T1", (0.0, 0.0)));
    app.open_component_dialog(&trafo);

    let _ = run_ui_with(vec![], |ctx| {
        app.draw_component_dialog(ctx);
    });
    assert!(app.dialogs.is_open());
}

#[test]
fn deleting_cell_closes_its_dialog() {
    let mut app = app_with_identity_view();
    let load = app
        .diagram
        .add_cell(Cell::component(ComponentKind::Load, "L1", (0.0, 0.0)));
    app.open_component_dialog(&load);
    app.interaction.selected_cells = vec![load];
    app.delete_selection();
    assert!(!app.dialogs.is_open());
}

#[test]
fn running_empty_diagram_alerts_without_request() {
    let mut app = app_with_identity_view();
    let _ = run_ui_with(vec![], |ctx| {
        app.run_simulation(ctx);
    });
    assert!(!app.solver.in_flight);
    let alert = app.alert.clone().expect("alert shown");
    assert!(alert.contains("no components"), "{alert}");
}

#[test]
fn solver_failure_clears_in_flight_and_alerts() {
    let mut app = app_with_identity_view();
    app.solver.in_flight = true;
    if let Some(tx) = &app.solver.sender {
        tx.send(Err("Solver unreachable".into())).unwrap();
    }
    app.poll_solver();
    assert!(!app.solver.in_flight);
    assert_eq!(app.alert.as_deref(), Some("Solver unreachable"));
}

#[test]
fn solver_result_is_kept_for_display() {
    let mut app = app_with_identity_view();
    app.solver.in_flight = true;
    if let Some(tx) = &app.solver.sender {
        tx.send(Ok(serde_json::json!({ "converged": true }))).unwrap();
    }
    app.poll_solver();
    assert_eq!(app.solver.last_result, Some(serde_json::json!({ "converged": true })));

    let _ = run_ui_with(vec![], |ctx| {
        app.draw_solver_windows(ctx);
    });
    assert!(app.solver.last_result.is_some());
}

#[test]
fn preview_payload_lists_sample_records() {
    let mut app = app_with_identity_view();
    app.load_sample(ExampleKind::TwoBusFeeder);
    app.preview_payload();
    let preview = app.payload_preview.clone().expect("preview");
    assert!(preview.contains("\"typ\""), "{preview}");
    assert!(preview.contains("\"bus\""), "{preview}");
}

#[test]
fn loading_sample_replaces_diagram() {
    let mut app = app_with_identity_view();
    app.diagram
        .add_cell(Cell::component(ComponentKind::Load, "stale", (0.0, 0.0)));
    app.load_sample(ExampleKind::Substation);

    assert!(app.diagram.vertices().all(|cell| cell.label() != "stale"));
    assert!(!crate::network::flatten(&app.diagram).is_empty());
    assert!(app.file.has_unsaved_changes);
    assert!(!app.undo_history.can_undo());
}

#[test]
fn canvas_draws_shapes_for_sample() {
    let mut app = GridSketchApp::default();
    app.load_sample(ExampleKind::DcLink);
    let output = run_ui_with(vec![], |ctx| {
        egui::CentralPanel::default().show(ctx, |ui| {
            app.draw_canvas(ui);
        });
    });
    assert!(!output.shapes.is_empty());
}

#[test]
fn empty_canvas_is_centred_on_first_draw() {
    let mut app = GridSketchApp::default();
    let _ = run_ui_with(vec![], |ctx| {
        egui::CentralPanel::default().show(ctx, |ui| {
            app.draw_canvas(ui);
        });
    });
    assert_ne!(app.canvas.offset, egui::Vec2::ZERO);
}

#[test]
fn alert_ok_button_dismisses() {
    let mut app = GridSketchApp::default();
    app.show_alert("Something failed");

    let ctx = egui::Context::default();
    let mut ok_rect = None;
    // Windows settle their size over the first frames
    for _ in 0..3 {
        let _ = ctx.run(raw_input(vec![]), |ctx| {
            app.draw_alert(ctx);
            ok_rect = ctx.memory(|mem| mem.area_rect(egui::Id::new("alert_window")));
        });
    }
    assert!(app.alert.is_some());
    let area = ok_rect.expect("alert area");

    // The OK button sits near the bottom of the centred window
    let target = egui::pos2(area.left() + 20.0, area.bottom() - 14.0);
    for events in [
        vec![egui::Event::PointerMoved(target)],
        press(target, egui::Modifiers::NONE),
        release(target, egui::Modifiers::NONE),
    ] {
        let _ = ctx.run(raw_input(events), |ctx| {
            app.draw_alert(ctx);
        });
    }
    assert!(app.alert.is_none());
}

#[test]
fn properties_panel_enters_name_edit_and_focuses() {
    let mut app = app_with_identity_view();
    let id = app
        .diagram
        .add_cell(Cell::component(ComponentKind::Bus, "B1", (0.0, 0.0)));
    app.interaction.selected_cells = vec![id.clone()];
    app.start_editing_name(&id, "B1");

    let _ = run_ui_with(vec![], |ctx| {
        egui::SidePanel::right("properties_panel").show(ctx, |ui| {
            app.draw_properties_panel(ui);
        });
    });

    assert_eq!(app.interaction.editing_name.as_deref(), Some(id.as_str()));
    assert!(app.interaction.focus_requested_for_edit);
}

#[test]
fn renaming_records_undo_step() {
    let mut app = app_with_identity_view();
    let id = app
        .diagram
        .add_cell(Cell::component(ComponentKind::Bus, "B1", (0.0, 0.0)));
    app.start_editing_name(&id, "B1");
    app.interaction.temp_name = "  Main bus ".into();
    app.save_name_change(&id);

    assert_eq!(app.diagram.cell(&id).unwrap().label(), "Main bus");
    app.perform_undo();
    assert_eq!(app.diagram.cell(&id).unwrap().label(), "B1");
}

#[test]
fn unchanged_name_is_not_recorded() {
    let mut app = app_with_identity_view();
    let id = app
        .diagram
        .add_cell(Cell::component(ComponentKind::Bus, "B1", (0.0, 0.0)));
    app.start_editing_name(&id, "B1");
    app.save_name_change(&id);
    assert!(!app.undo_history.can_undo());
    assert!(app.interaction.editing_name.is_none());
}

#[test]
fn new_with_unsaved_changes_asks_first() {
    let mut app = app_with_identity_view();
    app.diagram
        .add_cell(Cell::component(ComponentKind::Load, "L1", (0.0, 0.0)));
    app.file.has_unsaved_changes = true;

    let _ = run_ui_with(vec![], |ctx| {
        app.request_confirmed(PendingConfirmAction::New, ctx);
    });
    assert!(app.file.show_unsaved_dialog);
    assert_eq!(app.diagram.cells.len(), 1);

    let _ = run_ui_with(vec![], |ctx| {
        let action = app.file.pending_confirm_action.take().unwrap();
        app.perform_confirmed(action, ctx);
    });
    assert!(app.diagram.cells.is_empty());
}

#[test]
fn full_frame_update_runs_headless() {
    let mut app = GridSketchApp::default();
    app.load_sample(ExampleKind::TwoBusFeeder);
    let first = app.diagram.vertices().next().map(|cell| cell.id.clone()).unwrap();
    app.interaction.selected_cells = vec![first];

    let _ = run_ui_with(vec![], |ctx| {
        egui::TopBottomPanel::top("top_toolbar").show(ctx, |ui| app.draw_toolbar(ui));
        egui::SidePanel::right("properties_panel").show(ctx, |ui| app.draw_properties_panel(ui));
        egui::CentralPanel::default().show(ctx, |ui| app.draw_canvas(ui));
        app.draw_unsaved_dialog(ctx);
        app.draw_component_dialog(ctx);
        app.draw_solver_windows(ctx);
        app.draw_alert(ctx);
    });
    assert!(app.alert.is_none());
}

#[test]
fn app_state_round_trips_without_transient_fields() {
    let mut app = GridSketchApp::default();
    app.load_sample(ExampleKind::TwoBusFeeder);
    app.show_alert("transient");
    app.dark_mode = false;

    let restored = GridSketchApp::from_json(&app.to_json().unwrap()).unwrap();
    assert_eq!(restored.diagram, app.diagram);
    assert!(!restored.dark_mode);
    assert!(restored.alert.is_none());
    assert!(restored.file.file_operation_sender.is_some());
    assert!(restored.solver.receiver.is_some());
}

#[test]
fn saved_diagram_file_loads_back() {
    let mut app = GridSketchApp::default();
    app.load_sample(ExampleKind::Substation);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("substation.json");
    std::fs::write(&path, app.diagram.to_json().unwrap()).unwrap();
    let content = std::fs::read_to_string(&path).unwrap();

    let mut other = GridSketchApp::default();
    other.apply_file_result(state::FileOperationResult::LoadCompleted(
        path.display().to_string(),
        content,
    ));
    assert_eq!(other.diagram, app.diagram);
    assert_eq!(
        crate::network::flatten(&other.diagram),
        crate::network::flatten(&app.diagram)
    );
}

#[test]
fn reset_keeps_preferences_only() {
    let mut app = GridSketchApp::default();
    app.load_sample(ExampleKind::TwoBusFeeder);
    app.dark_mode = false;
    app.properties_panel_width = 420.0;
    app.solver.config.endpoint = "http://solver.local/run".into();

    app.reset_non_ui_fields();

    assert!(app.diagram.cells.is_empty());
    assert!(!app.dark_mode);
    assert_eq!(app.properties_panel_width, 420.0);
    assert_eq!(app.solver.config.endpoint, "http://solver.local/run");
}

#[test]
fn edge_value_label_names_component() {
    let mut app = app_with_identity_view();
    let a = app
        .diagram
        .add_cell(Cell::component(ComponentKind::Bus, "B1", (0.0, 0.0)));
    let b = app
        .diagram
        .add_cell(Cell::component(ComponentKind::Bus, "B2", (300.0, 0.0)));
    let mut edge = Cell::edge(canvas::edge_style(ComponentKind::DcLine.tag()), Some(a), Some(b));
    edge.value = Some(CellValue {
        label: "DC1".into(),
        ..Default::default()
    });
    let edge_id = app.diagram.add_cell(edge);

    assert_eq!(app.find_edge_at_position(egui::pos2(150.0, 2.0)), Some(edge_id.clone()));
    app.open_component_dialog(&edge_id);
    let session = app.dialogs.session().expect("dialog for edge component");
    assert_eq!(session.form.kind, ComponentKind::DcLine);
}
