mod interaction;
mod physics;
mod player;
mod voxel;

use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use interaction::InteractionPlugin;
use player::PlayerPlugin;
use voxel::{VoxelPlugin, WorldSeed};

fn main() {
    // Parse seed from command line or environment variable
    let seed = parse_seed();

    App::new()
        .insert_resource(seed)
        .insert_resource(ClearColor(Color::srgb(0.53, 0.81, 0.92)))
        .insert_resource(GlobalAmbientLight {
            color: Color::WHITE,
            brightness: 400.0,
            ..default()
        })
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Cubeworld".to_string(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins((
            VoxelPlugin,
            PlayerPlugin,
            InteractionPlugin,
            FrameTimeDiagnosticsPlugin::default(),
        ))
        .add_systems(Startup, (setup_sun, print_controls))
        .run();
}

fn setup_sun(mut commands: Commands) {
    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -0.9, 0.5, 0.0)),
    ));
}

fn print_controls() {
    println!("=== Cubeworld Controls ===");
    println!("  WASD        - Move");
    println!("  Space       - Jump");
    println!("  Ctrl        - Sprint");
    println!("  Mouse       - Look around");
    println!("  Left click  - Break block");
    println!("  Right click - Place block");
    println!("  1-5 / Wheel - Select hotbar block");
}

fn parse_seed() -> WorldSeed {
    // Check command line arguments: --seed <value> or -s <value>
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--seed" || args[i] == "-s") && i + 1 < args.len() {
            let seed_str = &args[i + 1];
            // Try to parse as number first
            if let Ok(num) = seed_str.parse::<u32>() {
                info!("Using seed from command line: {}", num);
                return WorldSeed::new(num);
            } else {
                // Use string as seed
                info!("Using string seed from command line: {}", seed_str);
                return WorldSeed::from_string(seed_str);
            }
        }
    }

    // Check environment variable
    if let Ok(seed_str) = std::env::var("CUBEWORLD_SEED") {
        if let Ok(num) = seed_str.parse::<u32>() {
            info!("Using seed from environment: {}", num);
            return WorldSeed::new(num);
        } else {
            info!("Using string seed from environment: {}", seed_str);
            return WorldSeed::from_string(&seed_str);
        }
    }

    // Generate random seed based on current time
    let random_seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u32)
        .unwrap_or(12345);

    info!("Using random seed: {}", random_seed);
    WorldSeed::new(random_seed)
}
