//! Headless демо: два охранника патрулируют квадратный граф,
//! intruder бродит детерминированным random walk. Когда intruder
//! попадает в радиус демо-"сенсора", охранник переходит в Chase и
//! поднимает остальных через AlertChannel.
//!
//! Настоящий vision-сенсор (FOV-конус, raycast) живёт в host-слое —
//! здесь его заменяет простая проверка радиуса.

use bevy::prelude::*;
use rand::Rng;
use sentinel_simulation::{
    create_headless_app, AIState, Agent, AgentBundle, DeterministicRng, NavGraph, PatrolRoute,
    SensorEvent,
};

const SENSOR_RADIUS: f32 = 6.0;

fn main() {
    let seed = 42;
    println!("Starting sentinel headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);

    // Квадрат 20x20м + центральная нода
    let mut graph = NavGraph::default();
    let nw = graph.add_node(Vec3::new(-10.0, 0.0, -10.0));
    let ne = graph.add_node(Vec3::new(10.0, 0.0, -10.0));
    let se = graph.add_node(Vec3::new(10.0, 0.0, 10.0));
    let sw = graph.add_node(Vec3::new(-10.0, 0.0, 10.0));
    let center = graph.add_node(Vec3::new(0.0, 0.0, 0.0));
    graph.connect(nw, ne);
    graph.connect(ne, se);
    graph.connect(se, sw);
    graph.connect(sw, nw);
    graph.connect(center, nw);
    graph.connect(center, se);
    app.insert_resource(graph);

    // Два охранника на противоположных углах, встречные маршруты
    app.world_mut().spawn(AgentBundle {
        route: PatrolRoute::new(vec![nw, ne, se, sw]),
        transform: Transform::from_xyz(-10.0, 0.0, -10.0),
        ..Default::default()
    });
    app.world_mut().spawn(AgentBundle {
        route: PatrolRoute::new(vec![se, sw, nw, ne]),
        transform: Transform::from_xyz(10.0, 0.0, 10.0),
        ..Default::default()
    });

    let mut intruder_pos = Vec3::new(3.0, 0.0, 3.0);

    for tick in 0..1000 {
        // Intruder: детерминированный random walk
        {
            let mut rng = app.world_mut().resource_mut::<DeterministicRng>();
            let angle = rng.rng.gen::<f32>() * std::f32::consts::TAU;
            intruder_pos += Vec3::new(angle.cos(), 0.0, angle.sin()) * 0.05;
        }

        // Демо-сенсор: радиус без FOV-конуса
        let guards: Vec<(Entity, Vec3)> = {
            let world = app.world_mut();
            let mut query = world.query_filtered::<(Entity, &Transform), With<Agent>>();
            query
                .iter(world)
                .map(|(e, t)| (e, t.translation))
                .collect()
        };
        for (guard, position) in guards {
            if position.distance(intruder_pos) < SENSOR_RADIUS {
                app.world_mut().send_event(SensorEvent::TargetSpotted {
                    observer: guard,
                    position: intruder_pos,
                });
            } else {
                app.world_mut()
                    .send_event(SensorEvent::TargetLost { observer: guard });
            }
        }

        app.update();

        if tick % 100 == 0 {
            let world = app.world_mut();
            let mut query = world.query_filtered::<&AIState, With<Agent>>();
            let states: Vec<String> = query.iter(world).map(|s| format!("{:?}", s)).collect();
            println!("Tick {}: intruder {:?}, guards: {:?}", tick, intruder_pos, states);
        }
    }

    println!("Simulation complete!");
}
