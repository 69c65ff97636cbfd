use digitizer_core::{App, BlockPosition, Style};
use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Vec2};
use std::collections::HashMap;

const BLOCK_SIZE: Vec2 = Vec2::new(160.0, 56.0);
const MARGIN: Vec2 = Vec2::new(24.0, 24.0);

struct Palette {
    fill: Color32,
    selected: Color32,
    stroke: Color32,
    text: Color32,
    wire: Color32,
}

fn palette(style: Style) -> Palette {
    match style {
        Style::Light => Palette {
            fill: Color32::from_gray(235),
            selected: Color32::from_rgb(200, 220, 255),
            stroke: Color32::from_gray(90),
            text: Color32::BLACK,
            wire: Color32::from_rgb(40, 90, 200),
        },
        Style::Dark => Palette {
            fill: Color32::from_gray(50),
            selected: Color32::from_rgb(40, 70, 120),
            stroke: Color32::from_gray(170),
            text: Color32::WHITE,
            wire: Color32::from_rgb(120, 170, 255),
        },
    }
}

/// Block diagram of the active dashboard. Blocks can be dragged and
/// selected; "New sink" adds a sink with its source block.
pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let Some(dashboard) = app.dashboard() else {
        ui.label("No dashboard loaded.");
        return;
    };
    let definition = &dashboard.definition().flowgraph;
    let blocks: Vec<(u64, String, String)> = definition
        .blocks
        .iter()
        .map(|b| (b.id, b.name.clone(), b.type_name.clone()))
        .collect();
    let connections: Vec<(u64, u64)> = definition
        .connections
        .iter()
        .map(|c| (c.from_block, c.to_block))
        .collect();

    ui.horizontal(|ui| {
        if ui.button("New sink").clicked() {
            if let Err(err) = app.new_sink() {
                app.report_error(err);
            }
        }
        if let Some(selected) = app.fg_item.selected() {
            let selected_block = blocks.iter().find(|(id, _, _)| *id == selected);
            if let Some((_, name, type_name)) = selected_block {
                ui.separator();
                ui.label(format!("{name} ({type_name})"));
            }
        }
    });

    let colors = palette(app.fg_item.style());
    let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click());
    let origin = response.rect.min + MARGIN;
    if response.clicked() {
        app.fg_item.select(None);
    }

    let mut rects: HashMap<u64, Rect> = HashMap::new();
    for (id, _, _) in &blocks {
        let Some(position) = app.fg_item.position(*id) else {
            continue;
        };
        let min = origin + Vec2::new(position.x, position.y);
        rects.insert(*id, Rect::from_min_size(min, BLOCK_SIZE));
    }

    for (from, to) in &connections {
        if let (Some(a), Some(b)) = (rects.get(from), rects.get(to)) {
            let start = Pos2::new(a.right(), a.center().y);
            let end = Pos2::new(b.left(), b.center().y);
            painter.line_segment([start, end], Stroke::new(2.0, colors.wire));
        }
    }

    for (id, name, type_name) in &blocks {
        let Some(rect) = rects.get(id).copied() else {
            continue;
        };
        let block_response =
            ui.interact(rect, egui::Id::new(("fg_block", *id)), Sense::click_and_drag());
        if block_response.clicked() || block_response.drag_started() {
            app.fg_item.select(Some(*id));
        }
        if block_response.dragged() {
            let delta = block_response.drag_delta();
            if let Some(position) = app.fg_item.position(*id) {
                app.fg_item.set_position(
                    *id,
                    BlockPosition {
                        x: (position.x + delta.x).max(0.0),
                        y: (position.y + delta.y).max(0.0),
                    },
                );
            }
        }

        let fill = if app.fg_item.selected() == Some(*id) {
            colors.selected
        } else {
            colors.fill
        };
        painter.rect(rect, 6.0, fill, Stroke::new(1.0, colors.stroke));
        painter.text(
            rect.center() - Vec2::new(0.0, 8.0),
            Align2::CENTER_CENTER,
            name,
            FontId::proportional(14.0),
            colors.text,
        );
        painter.text(
            rect.center() + Vec2::new(0.0, 10.0),
            Align2::CENTER_CENTER,
            type_name,
            FontId::proportional(11.0),
            colors.stroke,
        );
    }
}
