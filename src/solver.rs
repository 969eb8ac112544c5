//! Log-linear ladder position solver
//!
//! Fragment migration distance is linear in `log10(size)`. Two anchors pin
//! the largest and smallest fragment; every other tick follows from
//! `y = m * log10(size) + n`.

use crate::domain::{LadderDefinition, LogicalPoint, PlacedLadder, Unit};

/// `y = m * log10(size) + n`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearLogModel {
    pub m: f64,
    pub n: f64,
}

impl LinearLogModel {
    /// Position of a fragment along the ladder axis
    pub fn position(&self, size: f64) -> f64 {
        self.m * size.log10() + self.n
    }
}

/// Fit the model through both anchors
///
/// `definition` is validated at construction, so `log10(small) - log10(large)`
/// is never zero here.
pub fn solve(
    anchor_start: LogicalPoint,
    anchor_stop: LogicalPoint,
    definition: &LadderDefinition,
) -> LinearLogModel {
    let large = definition.largest().log10();
    let small = definition.smallest().log10();
    let m = (anchor_stop.y - anchor_start.y) / (small - large);
    let n = anchor_start.y - m * large;
    LinearLogModel { m, n }
}

/// Which side of the anchor line the size labels go
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelSide {
    /// Bands lie right of the anchor: labels end at the anchor, lines run right
    LeftOfBands,
    /// Bands lie left of the anchor: labels start at the anchor, lines run left
    RightOfBands,
}

/// One tick of a solved ladder
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    pub size: f64,
    /// Position along the ladder axis
    pub y: f64,
    pub label: String,
    /// The recorded band this tick connects to, if any
    pub band: Option<LogicalPoint>,
}

/// Everything the renderer needs to draw one placed ladder
#[derive(Clone, Debug, PartialEq)]
pub struct LadderLayout {
    pub model: LinearLogModel,
    pub side: LabelSide,
    /// Mean x of recorded bands (0 when none), end point of connecting lines
    pub band_x: f64,
    /// x of the anchor line the label column hangs off
    pub anchor_x: f64,
    /// Visible ticks, largest fragment first
    pub ticks: Vec<Tick>,
}

impl LadderLayout {
    pub fn connecting_lines(&self) -> usize {
        self.ticks.iter().filter(|t| t.band.is_some()).count()
    }
}

/// Solve a placed ladder and pair its ticks with recorded bands
///
/// While no band is recorded every tick is visible. Once recording starts,
/// tick `i` is visible only when band `i` exists, so `k` recorded bands give
/// exactly `k` ticks and `k` connecting lines.
pub fn layout(ladder: &PlacedLadder, definition: &LadderDefinition, unit: Unit) -> LadderLayout {
    let model = solve(ladder.anchor_start, ladder.anchor_stop, definition);

    let band_x = if ladder.bands.is_empty() {
        0.0
    } else {
        ladder.bands.iter().map(|p| p.x).sum::<f64>() / ladder.bands.len() as f64
    };
    let side = if band_x >= ladder.anchor_start.x {
        LabelSide::LeftOfBands
    } else {
        LabelSide::RightOfBands
    };

    let recorded = ladder.bands.len();
    let ticks = definition
        .sizes_descending()
        .iter()
        .enumerate()
        .filter(|(i, _)| recorded == 0 || *i < recorded)
        .map(|(i, &size)| Tick {
            size,
            y: model.position(size),
            label: unit.format_size(size),
            band: ladder.bands.get(i).copied(),
        })
        .collect();

    LadderLayout {
        model,
        side,
        band_x,
        anchor_x: ladder.anchor_start.x,
        ticks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scenario_ladder() -> (PlacedLadder, LadderDefinition) {
        let def = LadderDefinition::new("scenario", &[10000.0, 5000.0, 1000.0]).unwrap();
        let placed = PlacedLadder::new(
            "scenario",
            LogicalPoint::new(0.0, -200.0),
            LogicalPoint::new(0.0, 200.0),
        );
        (placed, def)
    }

    #[test]
    fn test_scenario_positions() {
        let (placed, def) = scenario_ladder();
        let out = layout(&placed, &def, Unit::Bp);
        assert_eq!(out.ticks.len(), 3);
        assert_eq!(out.connecting_lines(), 0);

        let labels: Vec<_> = out.ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, ["10000 bp", "5000 bp", "1000 bp"]);

        let expected_mid = -200.0
            + (400.0 / (1000f64.log10() - 10000f64.log10()))
                * (5000f64.log10() - 10000f64.log10());
        assert!((out.ticks[0].y - -200.0).abs() < 1e-9);
        assert!((out.ticks[1].y - expected_mid).abs() < 1e-9);
        assert!((out.ticks[2].y - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_recorded_bands_limit_ticks() {
        let (mut placed, def) = scenario_ladder();
        placed.bands.push(LogicalPoint::new(50.0, -190.0));
        let out = layout(&placed, &def, Unit::Bp);
        assert_eq!(out.ticks.len(), 1);
        assert_eq!(out.connecting_lines(), 1);
        assert_eq!(out.band_x, 50.0);
        assert_eq!(out.side, LabelSide::LeftOfBands);
    }

    #[test]
    fn test_side_flips_when_bands_left_of_anchor() {
        let (mut placed, def) = scenario_ladder();
        placed.bands.push(LogicalPoint::new(-50.0, -190.0));
        placed.bands.push(LogicalPoint::new(-70.0, 0.0));
        let out = layout(&placed, &def, Unit::Kbp);
        assert_eq!(out.side, LabelSide::RightOfBands);
        assert_eq!(out.band_x, -60.0);
        assert_eq!(out.ticks[1].label, "5.00 kbp");
    }

    #[test]
    fn test_no_bands_uses_zero_average() {
        let def = LadderDefinition::new("x", &[100.0, 10.0]).unwrap();
        let placed = PlacedLadder::new("x", LogicalPoint::new(5.0, 0.0), LogicalPoint::new(5.0, 10.0));
        assert_eq!(layout(&placed, &def, Unit::Bp).side, LabelSide::RightOfBands);
    }

    proptest! {
        #[test]
        fn prop_anchors_are_reproduced(
            sizes in proptest::collection::vec(1.0f64..1e6, 2..25),
            y1 in -1e4f64..1e4,
            y2 in -1e4f64..1e4,
        ) {
            let def = match LadderDefinition::new("p", &sizes) {
                Ok(def) if def.largest() / def.smallest() > 1.01 => def,
                _ => return Ok(()),
            };
            let model = solve(LogicalPoint::new(0.0, y1), LogicalPoint::new(3.0, y2), &def);
            let tol = 1e-6 * (1.0 + y1.abs().max(y2.abs()));
            prop_assert!((model.position(def.largest()) - y1).abs() < tol);
            prop_assert!((model.position(def.smallest()) - y2).abs() < tol);
        }

        #[test]
        fn prop_k_bands_give_k_lines(k in 0usize..=12) {
            let table = crate::domain::LadderTable::builtin();
            let def = table.require("Eurogentec smartLadder").unwrap();
            let mut placed = PlacedLadder::new(def.name(), LogicalPoint::new(0.0, -300.0), LogicalPoint::new(0.0, 300.0));
            for i in 0..k {
                placed.bands.push(LogicalPoint::new(100.0, i as f64 * 10.0));
            }
            let out = layout(&placed, def, Unit::Bp);
            prop_assert_eq!(out.connecting_lines(), k);
            prop_assert_eq!(out.ticks.len(), if k == 0 { def.len() } else { k });
        }
    }
}
