use chrono::{DateTime, TimeDelta, Utc};
use dayline_protocol::{Point, RenderCommand, TextAlign, ThemeToken};

use crate::Y_MARGIN;
use crate::model::Lanes;
use crate::projection::TimeProjection;

const TICK_HEIGHT: f64 = 6.0;
const FONT_SIZE: f64 = 10.0;
const LABEL_Y: f64 = TICK_HEIGHT + FONT_SIZE * 1.2;
const LANE_LABEL_X: f64 = 4.0;

/// Render the hour ruler along the top edge.
///
/// One tick per hour over the whole padded domain, labelled with the
/// 12-hour clock. The ruler pans with the content, so it lives in its own
/// group translated by `pan_x`.
pub fn render_time_axis(projection: &TimeProjection, pan_x: f64) -> Vec<RenderCommand> {
    let (start, end) = projection.domain();
    let mut commands = Vec::with_capacity(2 * 49 + 5);

    commands.push(RenderCommand::PushTransform {
        translate: Point::new(pan_x, 0.0),
        scale: Point::new(1.0, 1.0),
    });
    commands.push(RenderCommand::BeginGroup {
        id: "x-axis".into(),
        label: None,
    });
    commands.push(RenderCommand::DrawLine {
        from: Point::new(0.0, 0.0),
        to: Point::new(projection.range_end() as f64, 0.0),
        color: ThemeToken::AxisLine,
        width: 1.0,
    });

    for t in hourly_ticks(start, end) {
        let x = projection.project(t) as f64;
        commands.push(RenderCommand::DrawLine {
            from: Point::new(x, 0.0),
            to: Point::new(x, TICK_HEIGHT),
            color: ThemeToken::AxisLine,
            width: 1.0,
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(x, LABEL_Y),
            text: format_hour(t),
            color: ThemeToken::AxisText,
            font_size: FONT_SIZE,
            align: TextAlign::Center,
        });
    }

    commands.push(RenderCommand::EndGroup);
    commands.push(RenderCommand::PopTransform);
    commands
}

/// Render lane names down the left edge. These do not pan.
pub fn render_lane_axis(lanes: &Lanes) -> Vec<RenderCommand> {
    if lanes.is_empty() {
        return Vec::new();
    }
    let mut commands = Vec::with_capacity(lanes.len() + 2);
    commands.push(RenderCommand::BeginGroup {
        id: "y-axis".into(),
        label: None,
    });
    for lane in lanes {
        let center = Y_MARGIN + f64::from(lane.y_offset) + f64::from(lane.height) / 2.0;
        commands.push(RenderCommand::DrawText {
            position: Point::new(LANE_LABEL_X, center),
            text: lane.name.clone(),
            color: ThemeToken::LaneLabel,
            font_size: FONT_SIZE,
            align: TextAlign::Left,
        });
    }
    commands.push(RenderCommand::EndGroup);
    commands
}

fn hourly_ticks(start: DateTime<Utc>, end: DateTime<Utc>) -> impl Iterator<Item = DateTime<Utc>> {
    std::iter::successors(Some(start), |t| Some(*t + TimeDelta::hours(1)))
        .take_while(move |t| *t <= end)
}

/// `%I`: zero-padded 12-hour clock.
fn format_hour(t: DateTime<Utc>) -> String {
    t.format("%I").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TimeWindow;
    use chrono::TimeZone;

    #[test]
    fn ticks_every_hour_across_the_padded_domain() {
        let window = TimeWindow::from_ymd(2024, 1, 1, 7).unwrap();
        let projection = TimeProjection::new(&window, 2400.0);
        let cmds = render_time_axis(&projection, -300.0);

        let labels: Vec<&str> = cmds
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels.len(), 49);
        assert_eq!(&labels[..3], &["07", "08", "09"]);
        assert_eq!(labels[6], "01");

        assert_eq!(
            cmds.first(),
            Some(&RenderCommand::PushTransform {
                translate: Point::new(-300.0, 0.0),
                scale: Point::new(1.0, 1.0),
            })
        );
    }

    #[test]
    fn ticks_sit_on_projected_hours() {
        let window = TimeWindow::from_ymd(2024, 1, 1, 7).unwrap();
        let projection = TimeProjection::new(&window, 2400.0);
        let cmds = render_time_axis(&projection, 0.0);
        let xs: Vec<f64> = cmds
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawText { position, .. } => Some(position.x),
                _ => None,
            })
            .take(3)
            .collect();
        assert_eq!(xs, vec![0.0, 100.0, 200.0]);
    }

    #[test]
    fn formats_twelve_hour_clock() {
        assert_eq!(format_hour(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()), "12");
        assert_eq!(format_hour(Utc.with_ymd_and_hms(2024, 1, 1, 13, 0, 0).unwrap()), "01");
    }

    #[test]
    fn lane_labels_are_centered_on_lanes() {
        let lanes = Lanes::assign(["Room A", "Room B"], 200);
        let cmds = render_lane_axis(&lanes);
        let positions: Vec<(f64, &str)> = cmds
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawText { position, text, .. } => Some((position.y, text.as_str())),
                _ => None,
            })
            .collect();
        assert_eq!(positions, vec![(90.0, "Room A"), (190.0, "Room B")]);
    }

    #[test]
    fn no_lanes_no_axis() {
        assert!(render_lane_axis(&Lanes::default()).is_empty());
    }
}
