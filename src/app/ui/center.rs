//! Central panel: the incision diagram, repainted from scratch every frame.

use super::super::ArcplanApp;
use crate::diagram;
use crate::plan::{ArcRole, resolve_arc_layout};
use egui::{Align2, Color32, FontId, Rect, Sense, Shape, Stroke, pos2, vec2};

const MIN_SURFACE: f32 = 180.0;
const TICK_STEP_DEGREES: i32 = 10;

impl ArcplanApp {
    pub(crate) fn ui_central_diagram(&mut self, ui: &mut egui::Ui) {
        let laterality = self.form.laterality;
        self.ensure_template(laterality);

        let available = ui.available_size();
        let (outer_rect, _response) = ui.allocate_exact_size(available, Sense::hover());
        let side = outer_rect
            .width()
            .min(outer_rect.height())
            .max(MIN_SURFACE);
        let rect = Rect::from_center_size(outer_rect.center(), vec2(side, side));
        let painter = ui.painter_at(rect);

        match self.template_texture(laterality) {
            Some(template) => {
                painter.image(
                    template.texture.id(),
                    rect,
                    Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                    Color32::WHITE,
                );
            }
            None => paint_fallback_schematic(&painter, rect),
        }

        painter.text(
            rect.left_top() + vec2(8.0, 8.0),
            Align2::LEFT_TOP,
            laterality.label(),
            FontId::proportional(14.0),
            ui.visuals().strong_text_color(),
        );

        let Some(outcome) = self.outcome.as_ref() else {
            return;
        };
        match resolve_arc_layout(&outcome.plan, laterality) {
            Ok(arcs) => {
                let radius = rect.width() * diagram::RADIUS_FRACTION;
                let stroke_width = rect.width() * diagram::STROKE_FRACTION;
                for arc in &arcs {
                    let color = match arc.role {
                        ArcRole::Primary => self.config.diagram.primary_arc.color32(),
                        ArcRole::Secondary => self.config.diagram.secondary_arc.color32(),
                    };
                    let points = diagram::arc_polyline(arc, rect.center(), radius);
                    painter.add(Shape::line(points, Stroke::new(stroke_width, color)));
                }
            }
            Err(err) => {
                // A plan that fails layout is a defect upstream; surface it
                // in place of the arcs rather than drawing partial geometry.
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    format!("Plan error: {err}"),
                    FontId::proportional(14.0),
                    ui.visuals().error_fg_color,
                );
            }
        }

        painter.text(
            rect.center_bottom() - vec2(0.0, 12.0),
            Align2::CENTER_BOTTOM,
            &outcome.recommendation,
            FontId::proportional(14.0),
            ui.visuals().strong_text_color(),
        );
    }
}

/// Plain schematic drawn while the template is still loading or failed to
/// load, so arcs are never composed over a stale background.
fn paint_fallback_schematic(painter: &egui::Painter, rect: Rect) {
    let center = rect.center();
    let ring_radius = rect.width() * 0.41;
    let limbus_radius = rect.width() * 0.24;
    let outline = Stroke::new(1.0, Color32::from_gray(150));

    painter.circle_stroke(center, ring_radius, outline);
    painter.circle_stroke(center, limbus_radius, outline);

    let mut angle = 0;
    while angle < 360 {
        let radians = f64::from(angle).to_radians();
        let inner = diagram::point_on_circle(center, ring_radius - 6.0, radians);
        let outer = diagram::point_on_circle(center, ring_radius, radians);
        painter.line_segment([inner, outer], outline);
        angle += TICK_STEP_DEGREES;
    }
}
