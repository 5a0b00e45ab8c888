// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `CanvasPort` adapter that paints draw ops with an egui `Painter`.
//!
//! Surface coordinates map 1:1 to egui points, offset by the top-left corner
//! of the allocated square. Glow is approximated with translucent rings; text
//! anchors sit on the baseline, so they are nudged down by a fraction of the
//! font size before egui's bottom-anchored layout is applied.

use crossing_scene_port::{
    CanvasPort, ColorRgba8, DrawOp, Frame, Glow, Point, Rect, Rotation, TextAlign, TextStyle,
    TransformStack,
};
use egui::{
    epaint::{CornerRadius, Mesh},
    Align2, Color32, FontId, Painter, Pos2, Shape, Stroke, StrokeKind,
};

const GLOW_STEPS: u8 = 4;
const BASELINE_DROP: f32 = 0.22;

pub struct EguiCanvas<'a> {
    painter: &'a Painter,
    origin: Pos2,
    stack: TransformStack,
}

impl<'a> EguiCanvas<'a> {
    pub fn new(painter: &'a Painter, origin: Pos2) -> Self {
        Self {
            painter,
            origin,
            stack: TransformStack::new(),
        }
    }

    fn pos(&self, p: Point) -> Pos2 {
        let m = self.stack.map_point(p);
        self.origin + egui::vec2(m.x, m.y)
    }

    fn rect(&self, r: Rect) -> egui::Rect {
        let m = self.stack.map_rect(r);
        egui::Rect::from_min_size(self.origin + egui::vec2(m.x, m.y), egui::vec2(m.w, m.h))
    }

    fn paint(&mut self, op: &DrawOp) {
        match op {
            DrawOp::VerticalGradient { rect, top, bottom } => {
                let r = self.rect(*rect);
                let (top, bottom) = match self.stack.rotation() {
                    Rotation::Upright => (*top, *bottom),
                    Rotation::Reversed => (*bottom, *top),
                };
                let mut mesh = Mesh::default();
                mesh.colored_vertex(r.left_top(), color32(top));
                mesh.colored_vertex(r.right_top(), color32(top));
                mesh.colored_vertex(r.left_bottom(), color32(bottom));
                mesh.colored_vertex(r.right_bottom(), color32(bottom));
                mesh.add_triangle(0, 1, 2);
                mesh.add_triangle(2, 1, 3);
                self.painter.add(Shape::mesh(mesh));
            }
            DrawOp::FillRect { rect, color } => {
                self.painter
                    .rect_filled(self.rect(*rect), CornerRadius::ZERO, color32(*color));
            }
            DrawOp::FillRoundRect {
                rect,
                radius,
                color,
            } => {
                self.painter
                    .rect_filled(self.rect(*rect), corner(*radius), color32(*color));
            }
            DrawOp::StrokeRoundRect {
                rect,
                radius,
                width,
                color,
            } => {
                self.painter.rect_stroke(
                    self.rect(*rect),
                    corner(*radius),
                    Stroke::new(*width, color32(*color)),
                    StrokeKind::Middle,
                );
            }
            DrawOp::FillCircle {
                center,
                radius,
                color,
                glow,
            } => {
                let c = self.pos(*center);
                if let Some(glow) = glow {
                    for (r, color) in glow_rings(*radius, *glow) {
                        self.painter.circle_filled(c, r, color32(color));
                    }
                }
                self.painter.circle_filled(c, *radius, color32(*color));
            }
            DrawOp::Text {
                anchor,
                text,
                style,
                color,
                glow,
            } => {
                let at = self.pos(*anchor) + egui::vec2(0.0, style.size * BASELINE_DROP);
                if let Some(glow) = glow {
                    self.text(at, text, style, glow.color, 1.0);
                }
                self.text(at, text, style, *color, 0.0);
            }
            DrawOp::PushTransform(t) => self.stack.push(*t),
            DrawOp::PopTransform => self.stack.pop(),
        }
    }

    fn text(&self, at: Pos2, text: &str, style: &TextStyle, color: ColorRgba8, grow: f32) {
        let align = match style.align {
            TextAlign::Left => Align2::LEFT_BOTTOM,
            TextAlign::Center => Align2::CENTER_BOTTOM,
        };
        let font = FontId::proportional(style.size + grow);
        self.painter
            .text(at, align, text, font.clone(), color32(color));
        if style.bold {
            self.painter
                .text(at + egui::vec2(0.6, 0.0), align, text, font, color32(color));
        }
    }
}

impl CanvasPort for EguiCanvas<'_> {
    fn present(&mut self, frame: &Frame) {
        self.stack = TransformStack::new();
        for op in &frame.ops {
            self.paint(op);
        }
    }
}

fn color32(c: ColorRgba8) -> Color32 {
    Color32::from_rgba_unmultiplied(c[0], c[1], c[2], c[3])
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn corner(radius: f32) -> CornerRadius {
    CornerRadius::same(radius.round().clamp(0.0, 255.0) as u8)
}

/// Halo rings, outermost first, each more opaque than the last.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn glow_rings(radius: f32, glow: Glow) -> Vec<(f32, ColorRgba8)> {
    let [r, g, b, a] = glow.color;
    (0..GLOW_STEPS)
        .map(|i| {
            let frac = f32::from(i) / f32::from(GLOW_STEPS);
            let ring = radius + glow.radius * (1.0 - frac);
            let alpha = f32::from(a) * f32::from(i + 1) / f32::from(GLOW_STEPS * 2);
            (ring, [r, g, b, alpha.round() as u8])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crossing_proto::{CarRecord, Direction, LampPhase, Lights, StateSnapshot};
    use crossing_render::{build_frame, SurfaceSize};

    #[test]
    fn rings_fade_outward() {
        let rings = glow_rings(
            6.0,
            Glow {
                radius: 15.0,
                color: [0, 255, 0, 200],
            },
        );
        assert_eq!(rings.len(), usize::from(GLOW_STEPS));
        assert_relative_eq!(rings[0].0, 21.0);
        assert!(rings.windows(2).all(|w| w[0].0 > w[1].0 && w[0].1[3] < w[1].1[3]));
        assert!(rings.iter().all(|(r, c)| *r > 6.0 && c[3] <= 100));
    }

    #[test]
    fn corner_radius_is_clamped() {
        assert_eq!(corner(-3.0), CornerRadius::ZERO);
        assert_eq!(corner(4.4), CornerRadius::same(4));
        assert_eq!(corner(1e6), CornerRadius::same(255));
    }

    #[test]
    fn paints_a_full_scene_headless() {
        let snapshot = StateSnapshot {
            lights: Lights {
                north: LampPhase::Green,
                ..Lights::uniform(LampPhase::Red)
            },
            cars: vec![
                CarRecord::new(Direction::North, 450.0, [200, 40, 40]),
                CarRecord::new(Direction::South, 120.0, [40, 40, 200]).vip(),
            ],
            ..StateSnapshot::default()
        };
        let frame = build_frame(&snapshot, SurfaceSize::square(536.0), 0.0)
            .expect("non-empty surface");

        let ctx = egui::Context::default();
        let output = ctx.run(egui::RawInput::default(), |ctx| {
            let painter = ctx.layer_painter(egui::LayerId::background());
            let mut canvas = EguiCanvas::new(&painter, Pos2::new(32.0, 32.0));
            canvas.present(&frame);
            assert_eq!(canvas.stack.depth(), 0);
        });
        assert!(output.shapes.len() >= frame.ops.len() / 2);
    }
}
