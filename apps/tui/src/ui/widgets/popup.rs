use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// A rectangle taking the given share of `area`, centred in it.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(row);
    popup
}

/// A fixed-size rectangle centred in `area`, shrunk to fit.
pub fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_popup_fits_small_areas() {
        let area = Rect::new(0, 0, 20, 10);
        let popup = centered_fixed(60, 30, area);
        assert_eq!(popup, area);

        let popup = centered_fixed(10, 4, area);
        assert_eq!(popup, Rect::new(5, 3, 10, 4));
    }

    #[test]
    fn percentage_popup_stays_inside() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(70, 80, area);
        assert!(area.contains(popup.as_position()));
        assert_eq!(popup.width, 70);
        assert_eq!(popup.height, 32);
    }
}
