use approx::assert_relative_eq;
use cleaner_core::{Coord, ModelConfig, SimError, SimulationModel, StartCell};

/// Drives the model the way an external presentation loop would.
fn drive(model: &mut SimulationModel) -> u64 {
    let mut ticks = 0;
    while model.running() && ticks < model.config().tick_budget {
        model.step().unwrap();
        ticks += 1;
    }
    ticks
}

#[test]
fn single_speck_gets_cleaned() {
    let config = ModelConfig::new(5, 5, 1, 0.04, 10_000);
    let mut model = SimulationModel::new(config, 42).unwrap();

    assert_eq!(model.dirty_cells(), 1);
    assert!(model.running());

    let ticks = drive(&mut model);

    assert!(ticks < 10_000, "a lone cleaner on 5x5 should find the speck");
    assert_eq!(model.dirty_cells(), 0);
    assert!(!model.running());
    assert_relative_eq!(model.clean_fraction(), 1.0);
    // Every tick is a move except the one spent cleaning
    assert_eq!(model.total_agent_movements(), ticks - 1);
    assert_eq!(model.collector().len() as u64, ticks);
}

#[test]
fn spotless_world_keeps_moving() {
    let config = ModelConfig::new(6, 6, 3, 0.0, 100);
    let mut model = SimulationModel::new(config, 9).unwrap();

    assert_eq!(model.dirty_cells(), 0);
    assert!(!model.running());
    assert_eq!(drive(&mut model), 0);

    for _ in 0..5 {
        model.step().unwrap();
    }
    assert_eq!(model.total_agent_movements(), 15);
    assert_relative_eq!(model.clean_fraction(), 1.0);
}

#[test]
fn saturated_grid_is_rejected() {
    let config = ModelConfig::new(2, 2, 1, 1.0, 10);
    let err = SimulationModel::new(config, 42).unwrap_err();
    assert!(matches!(err, SimError::DegenerateInit { requested: 4, cells: 4 }));
}

#[test]
fn stepping_after_clean_is_harmless() {
    let config = ModelConfig::new(4, 4, 2, 0.0, 10).with_start_cell(StartCell::FarCorner);
    let mut model = SimulationModel::from_layout(config, 1, &[Coord::new(3, 3)]).unwrap();

    model.step().unwrap();
    assert_eq!(model.dirty_cells(), 0);
    let after_clean = model.total_agent_movements();
    // One cleaner cleaned, the other moved
    assert_eq!(after_clean, 1);

    for _ in 0..10 {
        model.step().unwrap();
    }
    assert_eq!(model.dirty_cells(), 0);
    assert!(!model.running());
    assert_eq!(model.total_agent_movements(), after_clean + 20);
}

#[test]
fn stacked_markers_cleaned_lowest_id_first() {
    let config = ModelConfig::new(3, 3, 1, 0.0, 10);
    let cell = Coord::new(2, 2);
    let mut model = SimulationModel::from_layout(config, 3, &[cell, cell]).unwrap();

    let ids: Vec<_> = model
        .entities()
        .filter(|e| e.coord == cell)
        .map(|e| e.id)
        .collect();
    assert_eq!(ids.len(), 3);

    model.step().unwrap();
    let remaining: Vec<_> = model
        .entities()
        .filter(|e| e.kind == cleaner_core::EntityKind::DirtyMarker)
        .map(|e| e.id)
        .collect();
    assert_eq!(remaining, vec![ids[1]]);

    model.step().unwrap();
    assert_eq!(model.dirty_cells(), 0);
    assert_eq!(model.total_agent_movements(), 0);
}

#[test]
fn classic_run_respects_budget() {
    let config = ModelConfig::default();
    let mut model = SimulationModel::new(config, 8521).unwrap();

    let ticks = drive(&mut model);
    assert!(ticks <= 100);
    assert!(model.dirty_cells() <= 125);

    let series = model.collector().records();
    assert_eq!(series.len() as u64, ticks);
    assert_relative_eq!(series[0].clean_fraction, 0.8);
    for pair in series.windows(2) {
        assert!(pair[1].agent_movements >= pair[0].agent_movements);
        assert!(pair[1].clean_fraction >= pair[0].clean_fraction);
    }
}
