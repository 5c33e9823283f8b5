//! Canvas rendering for the zone chooser
//!
//! Implements the iced canvas `Program` trait: `update` only translates
//! toolkit events into [`InputEvent`]s published through a callback closure,
//! `draw` paints the dimension rows from the state and region. All editing
//! logic stays in [`ChooserState`].

use iced::alignment::{Horizontal, Vertical};
use iced::widget::canvas::{self, Event, Frame, Geometry, Path, Program, Stroke, Text};
use iced::{keyboard, mouse, Color, Element, Length, Point, Rectangle, Size, Theme};

use strata_model::{matching_indices, DimensionCase, DimensionKind, Region};

use super::events::{InputEvent, Key, PointerButton};
use super::layout::{
    dim_bit_offset, has_custom_splits, masked_base, zone_boundary, ChooserLayout, ROW_HEIGHT,
};
use super::resize::DragSide;
use super::state::ChooserState;
use crate::theme;

/// Pixel height the chooser needs for a region
pub fn chooser_height(region: Option<&Region>) -> f32 {
    region
        .map(|r| r.dimension_count() as f32 * ROW_HEIGHT)
        .unwrap_or(0.0)
}

/// Create a zone chooser element.
///
/// # Arguments
/// * `state` - The chooser state
/// * `region` - The region whose dimension zones are displayed
/// * `on_input` - Called with each translated input event and the layout it
///   was measured against
pub fn zone_chooser<'a, Message: 'a>(
    state: &'a ChooserState,
    region: Option<&'a Region>,
    on_input: impl Fn(InputEvent, ChooserLayout) -> Message + 'a,
) -> Element<'a, Message> {
    iced::widget::Canvas::new(ZoneChooserCanvas {
        state,
        region,
        on_input,
    })
    .width(Length::Fill)
    .height(Length::Fixed(chooser_height(region).max(ROW_HEIGHT)))
    .into()
}

/// Canvas program painting the dimension-zone grid
pub struct ZoneChooserCanvas<'a, Message, F>
where
    F: Fn(InputEvent, ChooserLayout) -> Message,
{
    pub state: &'a ChooserState,
    pub region: Option<&'a Region>,
    pub on_input: F,
}

impl<'a, Message, F> ZoneChooserCanvas<'a, Message, F>
where
    F: Fn(InputEvent, ChooserLayout) -> Message,
{
    fn publish(
        &self,
        event: InputEvent,
        layout: ChooserLayout,
    ) -> Option<canvas::Action<Message>> {
        Some(canvas::Action::publish((self.on_input)(event, layout)))
    }
}

impl<'a, Message, F> Program<Message> for ZoneChooserCanvas<'a, Message, F>
where
    F: Fn(InputEvent, ChooserLayout) -> Message,
{
    type State = ();

    fn update(
        &self,
        _interaction: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        let layout = ChooserLayout::new(bounds.width);
        match event {
            Event::Mouse(mouse::Event::ButtonPressed(button)) => {
                let position = cursor.position_in(bounds)?;
                let button = match button {
                    mouse::Button::Left => PointerButton::Primary,
                    mouse::Button::Right => PointerButton::Secondary,
                    _ => return None,
                };
                self.publish(
                    InputEvent::PointerDown {
                        x: position.x,
                        y: position.y,
                        button,
                    },
                    layout,
                )
            }
            Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                // while a drag is active the pointer is captured: motion
                // outside the bounds still belongs to the gesture
                let position = if self.state.is_resizing() {
                    let p = cursor.position()?;
                    Point::new(p.x - bounds.x, p.y - bounds.y)
                } else {
                    cursor.position_in(bounds)?
                };
                self.publish(
                    InputEvent::PointerMoved {
                        x: position.x,
                        y: position.y,
                    },
                    layout,
                )
            }
            Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                let position = cursor
                    .position()
                    .map(|p| Point::new(p.x - bounds.x, p.y - bounds.y))
                    .unwrap_or(Point::ORIGIN);
                self.publish(
                    InputEvent::PointerUp {
                        x: position.x,
                        y: position.y,
                    },
                    layout,
                )
            }
            Event::Keyboard(keyboard::Event::KeyPressed { key, .. }) => {
                self.publish(InputEvent::KeyDown(map_key(key)?), layout)
            }
            Event::Keyboard(keyboard::Event::KeyReleased { key, .. }) => {
                self.publish(InputEvent::KeyUp(map_key(key)?), layout)
            }
            _ => None,
        }
    }

    fn mouse_interaction(
        &self,
        _interaction: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if self.state.wants_resize_cursor() {
            mouse::Interaction::ResizingHorizontally
        } else if cursor.is_over(bounds) {
            mouse::Interaction::Pointer
        } else {
            mouse::Interaction::default()
        }
    }

    fn draw(
        &self,
        _interaction: &Self::State,
        renderer: &iced::Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let Some(region) = self.region else {
            return vec![frame.into_geometry()];
        };
        let layout = ChooserLayout::new(bounds.width);

        for (dim, def) in region.dimension_defs().iter().enumerate() {
            let y = dim * ROW_HEIGHT as usize;
            self.draw_row_label(&mut frame, &layout, dim, def.kind, y as f32);
            self.draw_row_zones(&mut frame, &layout, region, dim, y as f32);
        }

        vec![frame.into_geometry()]
    }
}

impl<'a, Message, F> ZoneChooserCanvas<'a, Message, F>
where
    F: Fn(InputEvent, ChooserLayout) -> Message,
{
    fn draw_row_label(
        &self,
        frame: &mut Frame,
        layout: &ChooserLayout,
        dim: usize,
        kind: DimensionKind,
        y: f32,
    ) {
        let focused = self.state.focus_line() == dim;
        frame.fill_text(Text {
            content: kind.label().to_string(),
            position: Point::new(4.0, y + ROW_HEIGHT / 2.0),
            size: 12.0.into(),
            color: if focused {
                Color::WHITE
            } else {
                theme::LABEL_TEXT
            },
            align_y: Vertical::Center.into(),
            ..Text::default()
        });
        if focused {
            frame.stroke(
                &Path::rectangle(
                    Point::new(0.5, y + 0.5),
                    Size::new(layout.label_width - 1.0, ROW_HEIGHT - 1.0),
                ),
                Stroke::default()
                    .with_color(theme::SELECTION_BLUE)
                    .with_width(1.0),
            );
        }
    }

    fn draw_row_zones(
        &self,
        frame: &mut Frame,
        layout: &ChooserLayout,
        region: &Region,
        dim: usize,
        y: f32,
    ) {
        let defs = region.dimension_defs();
        let def = defs[dim];
        let base = masked_base(defs, self.state.main_slot(), dim);
        let bitpos = dim_bit_offset(defs, dim);
        let custom = has_custom_splits(region, base, dim);

        // the zone on the grabbed side of an active drag stays highlighted
        let drag_zone = self.state.resize_drag().and_then(|drag| {
            if drag.dimension != dim {
                return None;
            }
            match drag.side {
                DragSide::Left => Some(drag.zone),
                DragSide::Right => Some(drag.zone + 1),
                DragSide::None => None,
            }
        });

        // row frame and backdrop
        frame.fill_rectangle(
            Point::new(layout.label_width, y),
            Size::new(layout.grid_width() + 1.0, ROW_HEIGHT),
            theme::ZONE_BORDER,
        );
        frame.fill_rectangle(
            Point::new(layout.label_width + 1.0, y + 1.0),
            Size::new(layout.grid_width() - 1.0, ROW_HEIGHT - 2.0),
            theme::ZONE_BACKGROUND,
        );

        let mut prev_x = layout.label_width;
        let mut prev_boundary = 0u16;
        for zone in 0..def.zones {
            let boundary = if custom {
                zone_boundary(region, base, dim, &def, zone, true, bitpos) as u16
            } else {
                // uniform splits are drawn pixel-proportional
                ((zone as u32 + 1) * 128 / def.zones as u32) as u16
            };
            let x = layout.value_to_x(boundary);

            self.draw_zone_fill(frame, def.kind, zone, drag_zone == Some(zone), prev_x, x, y);
            self.draw_zone_icons(frame, region, def.kind, zone, prev_x, x, y);

            // numeric start / end of the zone, when there is room
            if x - prev_x > 36.0 {
                let lower = if custom { prev_boundary } else {
                    (zone as u32 * 128 / def.zones as u32) as u16
                };
                frame.fill_text(Text {
                    content: format!("{}", lower),
                    position: Point::new(prev_x + 3.0, y + ROW_HEIGHT / 2.0),
                    size: 10.0.into(),
                    color: theme::VALUE_TEXT,
                    align_y: Vertical::Center.into(),
                    ..Text::default()
                });
                frame.fill_text(Text {
                    content: format!("{}", boundary.saturating_sub(1)),
                    position: Point::new(x - 3.0, y + ROW_HEIGHT / 2.0),
                    size: 10.0.into(),
                    color: theme::VALUE_TEXT,
                    align_x: Horizontal::Right.into(),
                    align_y: Vertical::Center.into(),
                    ..Text::default()
                });
            }

            // boundary line
            frame.fill_rectangle(
                Point::new(x, y + 1.0),
                Size::new(1.0, ROW_HEIGHT - 2.0),
                theme::ZONE_BORDER,
            );

            prev_x = x;
            prev_boundary = boundary;
        }
    }

    fn draw_zone_fill(
        &self,
        frame: &mut Frame,
        kind: DimensionKind,
        zone: u8,
        dragged: bool,
        x0: f32,
        x1: f32,
        y: f32,
    ) {
        let is_main = dragged || self.state.main_case().get(&kind) == Some(&zone);
        let is_selected = self
            .state
            .selected_zones(kind)
            .map(|set| set.contains(&zone))
            .unwrap_or(false);
        let is_broadcast = self.state.settings.modify_all_dim_regions
            || (self.state.settings.modify_both_channels
                && kind == DimensionKind::SampleChannel);

        let fill = if is_main {
            theme::SELECTION_BLUE
        } else if is_selected {
            theme::MULTI_SELECT_BLUE
        } else if is_broadcast {
            theme::BROADCAST_TINT
        } else {
            return;
        };
        frame.fill_rectangle(
            Point::new(x0 + 1.0, y + 1.0),
            Size::new(x1 - x0 - 1.0, ROW_HEIGHT - 2.0),
            fill,
        );
    }

    /// Sample-reference and loop markers, aggregated over every leaf that
    /// matches this zone of this dimension
    fn draw_zone_icons(
        &self,
        frame: &mut Frame,
        region: &Region,
        kind: DimensionKind,
        zone: u8,
        x0: f32,
        x1: f32,
        y: f32,
    ) {
        let mut case = DimensionCase::new();
        case.insert(kind, zone);
        let leaves: Vec<_> = matching_indices(&case, region.dimension_defs())
            .into_iter()
            .filter_map(|i| region.slot(i))
            .collect();
        if leaves.is_empty() {
            return;
        }

        let sample_refs = leaves.iter().filter(|l| l.sample.is_some()).count();
        let loops = leaves.iter().filter(|l| l.loops > 0).count();
        let cx = (x0 + x1) / 2.0;

        if sample_refs < leaves.len() {
            let color = if sample_refs > 0 {
                theme::SAMPLE_REF_OK
            } else {
                theme::SAMPLE_REF_MISSING
            };
            frame.fill(&Path::circle(Point::new(cx, y + 6.0), 3.0), color);
        }
        if loops > 0 {
            let color = if loops == leaves.len() {
                theme::LOOP_ALL
            } else {
                theme::LOOP_SOME
            };
            frame.stroke(
                &Path::circle(Point::new(cx, y + ROW_HEIGHT - 7.0), 4.0),
                Stroke::default().with_color(color).with_width(1.5),
            );
        }
    }
}

fn map_key(key: &keyboard::Key) -> Option<Key> {
    use keyboard::key::Named;
    match key {
        keyboard::Key::Named(Named::Control) => Some(Key::MultiSelect),
        keyboard::Key::Named(Named::Super) | keyboard::Key::Named(Named::Meta) => {
            Some(Key::Primary)
        }
        keyboard::Key::Named(Named::Shift) => Some(Key::Shift),
        keyboard::Key::Named(Named::ArrowLeft) => Some(Key::Left),
        keyboard::Key::Named(Named::ArrowRight) => Some(Key::Right),
        keyboard::Key::Named(Named::ArrowUp) => Some(Key::Up),
        keyboard::Key::Named(Named::ArrowDown) => Some(Key::Down),
        _ => None,
    }
}
