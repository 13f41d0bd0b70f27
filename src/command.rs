//! Style mutations expressed as message objects.
//!
//! Shapes never have their style poked directly by outside code; callers build
//! a [`StyleCommand`] and hand it to the frame, which applies it and keeps the
//! inverse for undo.

use crate::draw::{Color, Shape, Texture};

/// One change to a shape's [`Style`](crate::draw::Style).
#[derive(Debug, Clone, PartialEq)]
pub enum StyleCommand {
    /// Outline color
    SetBorderColor(Color),
    /// Solid fill; `None` clears both the fill color and any texture
    SetFill(Option<Color>),
    /// Tiled texture, leaving the fill color alone
    SetTexture(Option<Texture>),
    /// Outline width, clamped to at least 1
    SetThickness(u32),
    SetAntialiasing(bool),
    /// Restores fill color and texture together (produced by undo of `SetFill`)
    RestoreInterior {
        fill_color: Option<Color>,
        texture: Option<Texture>,
    },
}

impl StyleCommand {
    /// Applies the command and returns the command that undoes it.
    pub fn apply(&self, shape: &mut Shape) -> StyleCommand {
        let style = shape.style_mut();
        match self {
            StyleCommand::SetBorderColor(color) => {
                let previous = std::mem::replace(&mut style.border_color, *color);
                StyleCommand::SetBorderColor(previous)
            }
            StyleCommand::SetFill(fill) => {
                let inverse = StyleCommand::RestoreInterior {
                    fill_color: style.fill_color,
                    texture: style.texture.clone(),
                };
                style.fill_color = *fill;
                if fill.is_none() {
                    style.texture = None;
                }
                inverse
            }
            StyleCommand::SetTexture(texture) => {
                let previous = std::mem::replace(&mut style.texture, texture.clone());
                StyleCommand::SetTexture(previous)
            }
            StyleCommand::SetThickness(thickness) => {
                let previous = std::mem::replace(&mut style.thickness, (*thickness).max(1));
                StyleCommand::SetThickness(previous)
            }
            StyleCommand::SetAntialiasing(enabled) => {
                let previous = std::mem::replace(&mut style.antialiasing, *enabled);
                StyleCommand::SetAntialiasing(previous)
            }
            StyleCommand::RestoreInterior {
                fill_color,
                texture,
            } => {
                let inverse = StyleCommand::RestoreInterior {
                    fill_color: style.fill_color,
                    texture: style.texture.clone(),
                };
                style.fill_color = *fill_color;
                style.texture = texture.clone();
                inverse
            }
        }
    }

    /// Short label for logs.
    pub fn name(&self) -> &'static str {
        match self {
            StyleCommand::SetBorderColor(_) => "set_border_color",
            StyleCommand::SetFill(_) => "set_fill",
            StyleCommand::SetTexture(_) => "set_texture",
            StyleCommand::SetThickness(_) => "set_thickness",
            StyleCommand::SetAntialiasing(_) => "set_antialiasing",
            StyleCommand::RestoreInterior { .. } => "restore_interior",
        }
    }
}
