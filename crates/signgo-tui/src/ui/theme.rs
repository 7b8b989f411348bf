//! Visual theme and color palette

use ratatui::style::{Color, Modifier, Style};
use signgo_core::StatusTone;

/// Sign&Go color palette
pub struct Theme {
    // Brand
    pub brand: Color,
    pub brand_dark: Color,
    pub surface: Color,

    // Status colors
    pub success: Color,
    pub warning: Color,
    pub danger: Color,
    pub info: Color,

    // UI element colors
    pub border: Color,
    pub border_focused: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub selection: Color,

    // Map
    pub map_land: Color,
    pub map_user: Color,
    pub map_current: Color,
    pub map_next: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            brand: Color::Rgb(59, 130, 246),     // #3B82F6
            brand_dark: Color::Rgb(30, 64, 175), // #1E40AF
            surface: Color::Rgb(17, 24, 39),     // #111827

            success: Color::Rgb(16, 185, 129), // #10B981
            warning: Color::Rgb(245, 158, 11), // #F59E0B
            danger: Color::Rgb(239, 68, 68),   // #EF4444
            info: Color::Rgb(59, 130, 246),    // #3B82F6

            border: Color::Rgb(75, 85, 99),            // #4B5563
            border_focused: Color::Rgb(59, 130, 246),  // #3B82F6
            text_primary: Color::Rgb(249, 250, 251),   // #F9FAFB
            text_secondary: Color::Rgb(209, 213, 219), // #D1D5DB
            text_muted: Color::Rgb(156, 163, 175),     // #9CA3AF
            selection: Color::Rgb(31, 41, 55),         // #1F2937

            map_land: Color::Rgb(75, 85, 99),
            map_user: Color::Rgb(59, 130, 246),
            map_current: Color::Rgb(239, 68, 68),
            map_next: Color::Rgb(16, 185, 129),
        }
    }
}

impl Theme {
    pub fn text(&self) -> Style {
        Style::default().fg(self.text_primary)
    }

    pub fn text_secondary(&self) -> Style {
        Style::default().fg(self.text_secondary)
    }

    pub fn text_muted(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    pub fn text_highlight(&self) -> Style {
        Style::default().fg(self.brand).add_modifier(Modifier::BOLD)
    }

    pub fn title(&self) -> Style {
        Style::default().fg(self.brand).add_modifier(Modifier::BOLD)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn border_focused(&self) -> Style {
        Style::default().fg(self.border_focused)
    }

    /// Border style for a field that may have focus
    pub fn border_for(&self, focused: bool) -> Style {
        if focused {
            self.border_focused()
        } else {
            self.border()
        }
    }

    pub fn success(&self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn warning(&self) -> Style {
        Style::default().fg(self.warning)
    }

    pub fn danger(&self) -> Style {
        Style::default().fg(self.danger).add_modifier(Modifier::BOLD)
    }

    pub fn info(&self) -> Style {
        Style::default().fg(self.info)
    }

    pub fn menu_item(&self, selected: bool) -> Style {
        if selected {
            Style::default()
                .bg(self.selection)
                .fg(self.brand)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.text_primary)
        }
    }

    /// Button style; the selected one is filled
    pub fn button(&self, selected: bool) -> Style {
        if selected {
            Style::default()
                .bg(self.brand)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.text_secondary).bg(self.selection)
        }
    }

    /// Badge color for a booking status
    pub fn tone_color(&self, tone: StatusTone) -> Color {
        match tone {
            StatusTone::Yellow => Color::Rgb(234, 179, 8),
            StatusTone::Blue => Color::Rgb(59, 130, 246),
            StatusTone::Purple => Color::Rgb(168, 85, 247),
            StatusTone::Indigo => Color::Rgb(99, 102, 241),
            StatusTone::Orange => Color::Rgb(249, 115, 22),
            StatusTone::Teal => Color::Rgb(20, 184, 166),
            StatusTone::Cyan => Color::Rgb(6, 182, 212),
            StatusTone::Green => Color::Rgb(34, 197, 94),
            StatusTone::Gray => Color::Rgb(107, 114, 128),
        }
    }

    /// Status badge: dark text on the tone color
    pub fn status_badge(&self, tone: StatusTone) -> Style {
        Style::default()
            .bg(self.tone_color(tone))
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signgo_core::BookingStatus;

    #[test]
    fn test_every_status_has_a_distinct_badge() {
        let theme = Theme::default();
        let mut colors: Vec<Color> = BookingStatus::SEQUENCE
            .iter()
            .map(|s| theme.tone_color(s.tone()))
            .collect();
        colors.push(theme.tone_color(BookingStatus::Unknown("X".into()).tone()));

        let count = colors.len();
        colors.sort_by_key(|c| format!("{:?}", c));
        colors.dedup();
        assert_eq!(colors.len(), count);
    }
}
