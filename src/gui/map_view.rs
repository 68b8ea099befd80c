use std::time::Instant;

use iced::widget::canvas::{self, Canvas, Frame, Geometry, Path, Stroke};
use iced::{Color, Event, Length, Point, Rectangle, Renderer, Size, Theme, Vector, mouse};

use crate::core::status::CountryStatus;
use crate::gui::message::Message;
use crate::map::projection::Viewport;
use crate::map::scene::{MapScene, ProjectedPolygon, Rgba};

/// Cursor travel below this is a click, above it a drag.
const CLICK_SLOP: f32 = 4.0;

/// Canvas widget over the projected scene. The scene and the geometry
/// cache live in the app state; everything ephemeral (zoom, pan, hover,
/// drag) lives in the canvas interaction state and resets with it.
pub struct MapView<'a> {
    scene: &'a MapScene,
    cache: &'a canvas::Cache,
}

impl<'a> MapView<'a> {
    pub fn widget(scene: &'a MapScene, cache: &'a canvas::Cache) -> Canvas<Self, Message> {
        Canvas::new(Self { scene, cache })
            .width(Length::Fill)
            .height(Length::Fill)
    }
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    last: Point,
    travel: f32,
}

#[derive(Debug, Default)]
pub struct Interaction {
    viewport: Viewport,
    drag: Option<Drag>,
    hovered: Option<String>,
}

/// Scale and offsets that center the fixed-size base canvas inside the
/// widget bounds. Cheap, recomputed per event/draw; the lon/lat
/// projection itself never reruns.
fn fit_params(size: Size) -> (f32, f32, f32) {
    let scale = (size.width / crate::map::scene::BASE_WIDTH)
        .min(size.height / crate::map::scene::BASE_HEIGHT);
    let ox = (size.width - crate::map::scene::BASE_WIDTH * scale) / 2.0;
    let oy = (size.height - crate::map::scene::BASE_HEIGHT * scale) / 2.0;
    (scale, ox, oy)
}

fn to_color(c: Rgba) -> Color {
    Color::from_rgba(c.r, c.g, c.b, c.a)
}

fn polygon_path(polygon: &ProjectedPolygon) -> Path {
    Path::new(|builder| {
        for ring in &polygon.rings {
            let mut points = ring.iter();
            if let Some(&(x, y)) = points.next() {
                builder.move_to(Point::new(x, y));
                for &(x, y) in points {
                    builder.line_to(Point::new(x, y));
                }
                builder.close();
            }
        }
    })
}

fn status_label(status: Option<CountryStatus>) -> &'static str {
    match status {
        Some(CountryStatus::Visited) => "Visited",
        Some(CountryStatus::Wishlist) => "Wishlist",
        None => "Not marked",
    }
}

impl MapView<'_> {
    /// Widget-relative point -> base coordinates.
    fn to_base(&self, viewport: &Viewport, bounds: Rectangle, p: Point) -> (f32, f32) {
        let (scale, ox, oy) = fit_params(bounds.size());
        viewport.to_base(((p.x - ox) / scale, (p.y - oy) / scale))
    }
}

impl canvas::Program<Message> for MapView<'_> {
    type State = Interaction;

    fn update(
        &self,
        state: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        match event {
            Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                let p = cursor.position_in(bounds)?;
                let steps = match delta {
                    mouse::ScrollDelta::Lines { y, .. } => *y,
                    mouse::ScrollDelta::Pixels { y, .. } => y / 40.0,
                };
                let factor = 1.0 + steps.clamp(-3.0, 3.0) * 0.15;
                let (scale, ox, oy) = fit_params(bounds.size());
                state
                    .viewport
                    .zoom_by(factor, ((p.x - ox) / scale, (p.y - oy) / scale));
                self.cache.clear();
                Some(canvas::Action::request_redraw().and_capture())
            }
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let p = cursor.position_in(bounds)?;
                state.drag = Some(Drag {
                    last: p,
                    travel: 0.0,
                });
                Some(canvas::Action::capture())
            }
            Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                let Some(p) = cursor.position_in(bounds) else {
                    let had_hover = state.hovered.take().is_some();
                    state.drag = None;
                    return had_hover.then(canvas::Action::request_redraw);
                };

                if let Some(drag) = &mut state.drag {
                    let (scale, _, _) = fit_params(bounds.size());
                    let (dx, dy) = (p.x - drag.last.x, p.y - drag.last.y);
                    drag.travel += dx.abs() + dy.abs();
                    drag.last = p;
                    state.viewport.pan_by(dx / scale, dy / scale);
                    self.cache.clear();
                    return Some(canvas::Action::request_redraw().and_capture());
                }

                let base = self.to_base(&state.viewport, bounds, p);
                let hovered = self.scene.region_at(base).map(|r| r.id.clone());
                if hovered != state.hovered {
                    state.hovered = hovered;
                    Some(canvas::Action::request_redraw())
                } else {
                    // Tooltip follows the cursor.
                    state.hovered.is_some().then(canvas::Action::request_redraw)
                }
            }
            Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                let drag = state.drag.take()?;
                if drag.travel >= CLICK_SLOP {
                    return Some(canvas::Action::request_redraw());
                }
                let p = cursor.position_in(bounds)?;
                let base = self.to_base(&state.viewport, bounds, p);
                let region = self.scene.region_at(base)?;
                Some(
                    canvas::Action::publish(Message::RegionActivated {
                        id: region.id.clone(),
                        next: self.scene.next_status(&region.id),
                    })
                    .and_capture(),
                )
            }
            Event::Mouse(mouse::Event::CursorLeft) => {
                state.drag = None;
                state.hovered = None;
                Some(canvas::Action::request_redraw())
            }
            _ => None,
        }
    }

    fn draw(
        &self,
        state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let viewport = state.viewport;
        let now = Instant::now();

        let map = self.cache.draw(renderer, bounds.size(), |frame| {
            frame.fill_rectangle(Point::ORIGIN, frame.size(), to_color(Rgba::OCEAN));

            let (scale, ox, oy) = fit_params(frame.size());
            frame.with_save(|frame| {
                frame.translate(Vector::new(ox, oy));
                frame.scale(scale);
                frame.translate(Vector::new(viewport.pan_x, viewport.pan_y));
                frame.scale(viewport.zoom);

                let border_width = 1.0 / (scale * viewport.zoom);
                for region in self.scene.regions() {
                    let fill = to_color(self.scene.fill_color(&region.id, now));
                    for polygon in &region.polygons {
                        let path = polygon_path(polygon);
                        frame.fill(
                            &path,
                            canvas::Fill {
                                style: fill.into(),
                                rule: canvas::fill::Rule::EvenOdd,
                            },
                        );
                        frame.stroke(
                            &path,
                            Stroke::default()
                                .with_color(to_color(Rgba::BORDER))
                                .with_width(border_width),
                        );
                    }
                }
            });
        });

        let mut overlay = Frame::new(renderer, bounds.size());
        if let Some(hovered) = &state.hovered {
            if let Some(region) = self.scene.regions().iter().find(|r| &r.id == hovered) {
                let (scale, ox, oy) = fit_params(bounds.size());
                overlay.with_save(|frame| {
                    frame.translate(Vector::new(ox, oy));
                    frame.scale(scale);
                    frame.translate(Vector::new(viewport.pan_x, viewport.pan_y));
                    frame.scale(viewport.zoom);

                    let stroke = Stroke::default()
                        .with_color(to_color(Rgba::HOVER_STROKE))
                        .with_width(2.0 / (scale * viewport.zoom));
                    for polygon in &region.polygons {
                        frame.stroke(&polygon_path(polygon), stroke);
                    }
                });

                if let Some(p) = cursor.position_in(bounds) {
                    let label = format!(
                        "{} — {}",
                        region.name,
                        status_label(self.scene.status_of(&region.id))
                    );
                    let pad = 6.0;
                    let size = Size::new(label.len() as f32 * 7.5 + pad * 2.0, 26.0);
                    let anchor = Point::new(
                        (p.x + 12.0).min(bounds.width - size.width),
                        (p.y - 34.0).max(0.0),
                    );
                    overlay.fill(
                        &Path::rounded_rectangle(anchor, size, 4.0.into()),
                        Color::from_rgba(0.05, 0.06, 0.09, 0.9),
                    );
                    overlay.fill_text(canvas::Text {
                        content: label,
                        position: Point::new(anchor.x + pad, anchor.y + pad),
                        color: Color::WHITE,
                        size: 13.0.into(),
                        ..canvas::Text::default()
                    });
                }
            }
        }

        vec![map, overlay.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        _bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if state.drag.is_some() {
            mouse::Interaction::Grabbing
        } else if state.hovered.is_some() {
            mouse::Interaction::Pointer
        } else {
            mouse::Interaction::default()
        }
    }
}
