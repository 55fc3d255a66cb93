use eframe::egui;
use image::RgbImage;

use crate::session::{InteractionSession, Result};
use crate::viewport::{Canvas, PointerButton};

const CANVAS_BACKGROUND: egui::Color32 = egui::Color32::from_gray(16);
const CURSOR_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 215, 0);

pub(super) fn to_color_image(image: &RgbImage) -> egui::ColorImage {
    egui::ColorImage::from_rgb(
        [image.width() as usize, image.height() as usize],
        image.as_raw(),
    )
}

fn slot(canvas: Canvas) -> usize {
    match canvas {
        Canvas::Left => 0,
        Canvas::Right => 1,
    }
}

/// GPU textures for the two canvases, re-uploaded when the session
/// generation moves.
#[derive(Default)]
pub(super) struct CanvasPair {
    textures: [Option<egui::TextureHandle>; 2],
    rendered: Option<u64>,
}

impl CanvasPair {
    pub(super) fn refresh(&mut self, ctx: &egui::Context, session: &InteractionSession) -> Result<()> {
        let generation = session.generation();
        if self.rendered == Some(generation) {
            return Ok(());
        }

        let frames = match session.render() {
            Ok(frames) => frames,
            Err(error) => {
                self.textures = [None, None];
                self.rendered = Some(generation);
                return Err(error);
            }
        };
        for (index, image) in [&frames.left, &frames.right].into_iter().enumerate() {
            let color = to_color_image(image);
            match &mut self.textures[index] {
                Some(texture) => texture.set(color, egui::TextureOptions::NEAREST),
                None => {
                    self.textures[index] = Some(ctx.load_texture(
                        format!("canvas-texture-{index}"),
                        color,
                        egui::TextureOptions::NEAREST,
                    ));
                }
            }
        }
        self.rendered = Some(generation);
        Ok(())
    }

    pub(super) fn show(&self, ui: &mut egui::Ui, canvas: Canvas, session: &mut InteractionSession) {
        let size = egui::vec2(ui.available_width().max(1.0), ui.available_height().max(1.0));
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, CANVAS_BACKGROUND);

        let (Some(texture), Some([height, width])) =
            (&self.textures[slot(canvas)], session.viewport().image_size())
        else {
            return;
        };

        let transform = session.viewport().transform(canvas);
        let offset = rect.min.to_vec2();
        let bounds = transform
            .image_bounds(egui::vec2(width as f32, height as f32))
            .translate(offset);
        painter.image(
            texture.id(),
            bounds,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        let cursor = session.cursor();
        let center = transform
            .image_to_canvas(egui::pos2(cursor.col as f32 + 0.5, cursor.row as f32 + 0.5))
            + offset;
        painter.circle_stroke(
            center,
            (transform.scale * 0.5).max(2.0),
            egui::Stroke::new(1.0, CURSOR_COLOR),
        );

        route_pointer(ui, rect, &response, session);
    }
}

/// Forwards drag and wheel input in canvas-local coordinates.
fn route_pointer(
    ui: &egui::Ui,
    rect: egui::Rect,
    response: &egui::Response,
    session: &mut InteractionSession,
) {
    let local = |position: egui::Pos2| (position - rect.min).to_pos2();

    if response.drag_started() {
        if let Some(position) = response.interact_pointer_pos() {
            let button = if response.dragged_by(egui::PointerButton::Middle) {
                PointerButton::Middle
            } else if response.dragged_by(egui::PointerButton::Secondary) {
                PointerButton::Secondary
            } else {
                PointerButton::Primary
            };
            session.pointer_down(button, local(position));
        }
    }

    let position = if response.dragged() {
        response.interact_pointer_pos()
    } else {
        response.hover_pos()
    };
    if let Some(position) = position {
        session.pointer_move(local(position));
    }

    if response.drag_stopped() {
        session.pointer_up();
    }

    if response.hovered() {
        let (scroll, zoom_modifier) =
            ui.input(|i| (i.raw_scroll_delta.y, i.modifiers.ctrl || i.modifiers.command));
        if scroll != 0.0 {
            if let Some(position) = response.hover_pos() {
                session.wheel(scroll, zoom_modifier, local(position));
            }
        }
    }
}
