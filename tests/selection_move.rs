use eframe_draw::editor::Editor;
use eframe_draw::options::EditorOptions;
use eframe_draw::selection::MoveMode;
use eframe_draw::shape::{ShapeDefaults, ShapeId, ShapeState, factory};

fn editor_with(move_mode: MoveMode) -> Editor {
    let mut editor = Editor::new(EditorOptions {
        snap_to_grid: false,
        move_mode,
        ..EditorOptions::default()
    });
    editor.set_tool("selection");
    editor
}

fn add_rectangle(editor: &mut Editor, x0: f64, y0: f64, x1: f64, y1: f64) -> ShapeId {
    let doc = &mut editor.context.document;
    let rect = factory::create_rectangle(doc, x0, y0, x1, y1, &ShapeDefaults::default());
    doc.current_layer_mut().add(rect);
    rect
}

fn positions(editor: &Editor, id: ShapeId) -> Vec<(f64, f64)> {
    let doc = &editor.context.document;
    doc.get_points(id)
        .into_iter()
        .filter_map(|point| doc.position(point))
        .collect()
}

#[test]
fn test_drag_moves_selected_shape_and_records_once() {
    let mut editor = editor_with(MoveMode::Point);
    let rect = add_rectangle(&mut editor, 0.0, 0.0, 30.0, 30.0);

    editor.left_down(15.0, 0.0);
    assert!(editor.context.selection.contains(rect));
    editor.pointer_move(20.0, 0.0);
    editor.pointer_move(25.0, 5.0);
    editor.left_up(25.0, 5.0);

    assert_eq!(positions(&editor, rect), vec![(10.0, 5.0), (40.0, 35.0)]);
    assert_eq!(editor.context.history.undo_len(), 1);
}

#[test]
fn test_click_without_drag_records_nothing() {
    let mut editor = editor_with(MoveMode::Point);
    add_rectangle(&mut editor, 0.0, 0.0, 30.0, 30.0);

    editor.left_down(15.0, 0.0);
    editor.left_up(15.0, 0.0);

    assert!(!editor.context.history.can_undo());
}

#[test]
fn test_dragging_a_corner_moves_only_that_point() {
    let mut editor = editor_with(MoveMode::Point);
    let rect = add_rectangle(&mut editor, 0.0, 0.0, 30.0, 30.0);

    editor.left_down(30.0, 30.0);
    editor.pointer_move(40.0, 50.0);
    editor.left_up(40.0, 50.0);

    assert_eq!(positions(&editor, rect), vec![(0.0, 0.0), (40.0, 50.0)]);
}

#[test]
fn test_locked_shape_does_not_move() {
    let mut editor = editor_with(MoveMode::Shape);
    let rect = add_rectangle(&mut editor, 0.0, 0.0, 30.0, 30.0);
    editor
        .context
        .document
        .get_mut(rect)
        .unwrap()
        .state
        .insert(ShapeState::LOCKED);

    editor.left_down(15.0, 0.0);
    editor.pointer_move(45.0, 10.0);
    editor.left_up(45.0, 10.0);

    assert_eq!(positions(&editor, rect), vec![(0.0, 0.0), (30.0, 30.0)]);
    assert!(!editor.context.history.can_undo());
}

#[test]
fn test_connector_moves_with_group_not_with_line() {
    let mut editor = editor_with(MoveMode::Shape);
    let rect = add_rectangle(&mut editor, 0.0, 0.0, 30.0, 30.0);
    let pin = factory::create_point(&mut editor.context.document, 30.0, 15.0);
    editor.context.document.current_layer_mut().add(pin);
    editor.context.select(rect);
    editor.context.select(pin);
    let group = editor.group_selection("g").unwrap().unwrap();

    let doc = &mut editor.context.document;
    let line = factory::create_line(doc, 30.0, 15.0, 80.0, 15.0, &ShapeDefaults::default());
    let start = doc.get_points(line)[0];
    doc.replace_point(line, start, pin);
    doc.discard(start);
    doc.current_layer_mut().add(line);

    editor.left_down(60.0, 15.0);
    assert!(editor.context.selection.contains(line));
    editor.pointer_move(70.0, 25.0);
    editor.left_up(70.0, 25.0);
    assert_eq!(positions(&editor, line), vec![(30.0, 15.0), (90.0, 25.0)]);

    editor.left_down(15.0, 15.0);
    assert!(editor.context.selection.contains(group));
    editor.pointer_move(20.0, 15.0);
    editor.left_up(20.0, 15.0);
    assert_eq!(editor.context.document.position(pin), Some((35.0, 15.0)));
    assert_eq!(positions(&editor, line)[0], (35.0, 15.0));
}

#[test]
fn test_tool_switch_mid_drag_reverts() {
    let mut editor = editor_with(MoveMode::Point);
    let rect = add_rectangle(&mut editor, 0.0, 0.0, 30.0, 30.0);

    editor.left_down(15.0, 0.0);
    editor.pointer_move(60.0, 60.0);
    editor.set_tool("line");

    assert_eq!(positions(&editor, rect), vec![(0.0, 0.0), (30.0, 30.0)]);
    assert!(!editor.context.history.can_undo());
}

#[test]
fn test_rubber_band_selects_enclosed_shapes() {
    let mut editor = editor_with(MoveMode::Point);
    let inside = add_rectangle(&mut editor, 0.0, 0.0, 20.0, 20.0);
    let outside = add_rectangle(&mut editor, 100.0, 100.0, 120.0, 120.0);

    editor.left_down(-10.0, -10.0);
    assert_eq!(editor.context.document.helper_layer().len(), 1);
    editor.pointer_move(50.0, 50.0);
    editor.left_up(50.0, 50.0);

    assert!(editor.context.selection.contains(inside));
    assert!(!editor.context.selection.contains(outside));
    assert!(editor.context.document.helper_layer().is_empty());
}

#[test]
fn test_click_on_empty_canvas_clears_selection() {
    let mut editor = editor_with(MoveMode::Point);
    let rect = add_rectangle(&mut editor, 0.0, 0.0, 20.0, 20.0);
    editor.context.select(rect);

    editor.left_down(200.0, 200.0);
    editor.left_up(200.0, 200.0);

    assert!(editor.context.selection.is_empty());
}

#[test]
fn test_delete_then_undo_restores_shape() {
    let mut editor = editor_with(MoveMode::Point);
    let rect = add_rectangle(&mut editor, 0.0, 0.0, 20.0, 20.0);
    editor.context.select(rect);

    assert_eq!(editor.delete_selection(), 1);
    assert!(editor.context.document.current_layer().is_empty());
    assert!(editor.context.selection.is_empty());

    editor.undo().unwrap();
    assert_eq!(editor.context.document.current_layer().shapes(), &[rect]);
}

#[test]
fn test_locked_group_protects_nested_points() {
    let mut editor = editor_with(MoveMode::Point);
    let doc = &mut editor.context.document;
    let line = factory::create_line(doc, 0.0, 0.0, 50.0, 0.0, &ShapeDefaults::default());
    doc.current_layer_mut().add(line);
    editor.context.select(line);
    let group = editor.group_selection("g").unwrap().unwrap();
    editor
        .context
        .document
        .get_mut(group)
        .unwrap()
        .state
        .insert(ShapeState::LOCKED);

    editor.left_down(50.0, 0.0);
    editor.pointer_move(80.0, 40.0);
    editor.left_up(80.0, 40.0);

    assert_eq!(positions(&editor, line), vec![(0.0, 0.0), (50.0, 0.0)]);
    assert_eq!(editor.context.history.undo_len(), 1);
}

fn line_attached_to_locked_line(move_mode: MoveMode) -> (Editor, ShapeId, ShapeId) {
    let mut editor = Editor::new(EditorOptions {
        snap_to_grid: false,
        try_to_connect: true,
        move_mode,
        ..EditorOptions::default()
    });
    let locked = add_locked_line(&mut editor);
    editor.set_tool("line");
    editor.left_down(50.0, 0.0);
    editor.left_down(90.0, 0.0);
    let attached = *editor.context.document.current_layer().shapes().last().unwrap();
    assert_eq!(
        editor.context.document.get_points(attached)[0],
        editor.context.document.get_points(locked)[1]
    );
    editor.set_tool("selection");
    (editor, locked, attached)
}

fn add_locked_line(editor: &mut Editor) -> ShapeId {
    let doc = &mut editor.context.document;
    let line = factory::create_line(doc, 0.0, 0.0, 50.0, 0.0, &ShapeDefaults::default());
    doc.get_mut(line).unwrap().state.insert(ShapeState::LOCKED);
    doc.current_layer_mut().add(line);
    line
}

#[test]
fn test_shape_drag_leaves_point_shared_with_locked_shape() {
    let (mut editor, locked, attached) = line_attached_to_locked_line(MoveMode::Shape);

    editor.left_down(70.0, 0.0);
    assert!(editor.context.selection.contains(attached));
    editor.pointer_move(90.0, 0.0);
    editor.left_up(90.0, 0.0);

    assert_eq!(positions(&editor, locked), vec![(0.0, 0.0), (50.0, 0.0)]);
    assert_eq!(positions(&editor, attached), vec![(50.0, 0.0), (110.0, 0.0)]);
}

#[test]
fn test_point_drag_leaves_point_shared_with_locked_shape() {
    let (mut editor, locked, attached) = line_attached_to_locked_line(MoveMode::Point);

    editor.left_down(70.0, 0.0);
    editor.pointer_move(90.0, 0.0);
    editor.left_up(90.0, 0.0);

    assert_eq!(positions(&editor, locked), vec![(0.0, 0.0), (50.0, 0.0)]);
    assert_eq!(positions(&editor, attached), vec![(50.0, 0.0), (110.0, 0.0)]);
}
