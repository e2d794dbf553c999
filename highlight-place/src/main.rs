use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;
use bevy::window::PresentMode;
use constants::highlight::{HIGHLIGHT_COLOUR, HIGHLIGHT_SCALE, PLACEABLE_COLOUR, SLOT_PAD_COLOUR};
use highlight_place::engine::components::{
    Placeable, PlacementSlot, SlotBinding, SlotHighlight, TriggerSensor, TriggerVolume,
};
use highlight_place::engine::events::GrabSignal;
use highlight_place::placement::AttachMode;
use highlight_place::{PlacementPlugin, PlacementSettings, SlotLayoutPlugin};

const SANDBOX_LAYOUT: &str = "sandbox";
const MOVE_SPEED: f32 = 1.5;
const CUBE_SIZE: f32 = 0.2;

/// Placeable currently driven by the keyboard.
#[derive(Component)]
struct Controlled;

/// Sandbox stand-in for a hand holding the object.
#[derive(Component, Default)]
struct Held(bool);

#[derive(Component)]
struct StatusText;

fn main() {
    create_app().run();
}

fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .add_plugins(SlotLayoutPlugin)
        .add_plugins(PlacementPlugin)
        .insert_resource(PlacementSettings {
            layout: Some(SANDBOX_LAYOUT.to_string()),
            ..default()
        })
        .add_systems(Startup, setup)
        .add_systems(
            Update,
            (
                decorate_slots,
                decorate_slot_highlights,
                switch_controlled,
                toggle_grab,
                move_held,
                status_text_update,
            ),
        );

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(Window {
            title: "highlight-place sandbox".into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 3.0, 5.0).looking_at(Vec3::new(0.0, 0.5, 0.0), Vec3::Y),
    ));
    commands.spawn((
        DirectionalLight {
            illuminance: 8000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(3.0, 6.0, 2.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(8.0, 8.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.15, 0.15, 0.17))),
    ));

    let cube = meshes.add(Cuboid::new(CUBE_SIZE, CUBE_SIZE, CUBE_SIZE));
    let cube_material = materials.add(PLACEABLE_COLOUR);
    let sensor = TriggerSensor {
        half_extents: Vec3::splat(CUBE_SIZE * 0.5),
    };

    commands.spawn((
        Name::new("joint_cube"),
        Placeable::new(AttachMode::Joint, SlotBinding::Group("pads".into())),
        sensor,
        Held::default(),
        Controlled,
        Mesh3d(cube.clone()),
        MeshMaterial3d(cube_material.clone()),
        Transform::from_xyz(-1.0, 1.0, 1.5),
    ));
    commands.spawn((
        Name::new("anchor_cube"),
        Placeable::new(AttachMode::Anchor, SlotBinding::Group("shelf".into())),
        sensor,
        Held::default(),
        Mesh3d(cube),
        MeshMaterial3d(cube_material),
        Transform::from_xyz(1.0, 1.0, 1.5),
    ));

    commands.spawn((
        StatusText,
        Text::new(""),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            left: Val::Px(12.0),
            ..default()
        },
    ));
}

fn decorate_slots(
    mut commands: Commands,
    slots: Query<(Entity, &TriggerVolume), Added<PlacementSlot>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (slot, volume) in &slots {
        let size = volume.half_extents * 2.0;
        commands.entity(slot).insert((
            Mesh3d(meshes.add(Cuboid::new(size.x, size.y, size.z))),
            MeshMaterial3d(materials.add(SLOT_PAD_COLOUR)),
        ));
    }
}

fn decorate_slot_highlights(
    mut commands: Commands,
    highlights: Query<(Entity, &ChildOf), Added<SlotHighlight>>,
    volumes: Query<&TriggerVolume>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (highlight, parent) in &highlights {
        let Ok(volume) = volumes.get(parent.parent()) else {
            continue;
        };
        let size = volume.half_extents * 2.0 * HIGHLIGHT_SCALE;
        commands.entity(highlight).insert((
            Mesh3d(meshes.add(Cuboid::new(size.x, size.y, size.z))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: HIGHLIGHT_COLOUR,
                alpha_mode: AlphaMode::Blend,
                unlit: true,
                ..default()
            })),
        ));
    }
}

/// Tab cycles keyboard control between placeables.
fn switch_controlled(
    mut commands: Commands,
    keys: Res<ButtonInput<KeyCode>>,
    placeables: Query<(Entity, Has<Controlled>), With<Placeable>>,
) {
    if !keys.just_pressed(KeyCode::Tab) {
        return;
    }
    let mut entities: Vec<(Entity, bool)> = placeables.iter().collect();
    entities.sort_by_key(|(entity, _)| *entity);
    let Some(current) = entities.iter().position(|(_, controlled)| *controlled) else {
        if let Some((first, _)) = entities.first() {
            commands.entity(*first).insert(Controlled);
        }
        return;
    };
    let next = (current + 1) % entities.len();
    commands.entity(entities[current].0).remove::<Controlled>();
    commands.entity(entities[next].0).insert(Controlled);
}

/// Space picks up or releases the controlled placeable.
fn toggle_grab(
    keys: Res<ButtonInput<KeyCode>>,
    mut held: Query<(Entity, &mut Held), With<Controlled>>,
    mut signals: EventWriter<GrabSignal>,
) {
    if !keys.just_pressed(KeyCode::Space) {
        return;
    }
    for (object, mut held) in &mut held {
        held.0 = !held.0;
        signals.write(GrabSignal {
            object,
            grabbed: held.0,
        });
    }
}

/// Arrows move on the ground plane, Q/E move vertically.
fn move_held(
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut held: Query<(&Held, &mut Transform), With<Controlled>>,
) {
    let mut direction = Vec3::ZERO;
    if keys.pressed(KeyCode::ArrowLeft) {
        direction.x -= 1.0;
    }
    if keys.pressed(KeyCode::ArrowRight) {
        direction.x += 1.0;
    }
    if keys.pressed(KeyCode::ArrowUp) {
        direction.z -= 1.0;
    }
    if keys.pressed(KeyCode::ArrowDown) {
        direction.z += 1.0;
    }
    if keys.pressed(KeyCode::KeyE) {
        direction.y += 1.0;
    }
    if keys.pressed(KeyCode::KeyQ) {
        direction.y -= 1.0;
    }
    if direction == Vec3::ZERO {
        return;
    }

    for (held, mut transform) in &mut held {
        if held.0 {
            transform.translation += direction.normalize() * MOVE_SPEED * time.delta_secs();
        }
    }
}

fn status_text_update(
    placeables: Query<(&Name, &Placeable, &Held, Has<Controlled>)>,
    names: Query<&Name>,
    mut text: Query<&mut Text, With<StatusText>>,
) {
    let Ok(mut text) = text.single_mut() else {
        return;
    };

    let mut lines = vec!["Tab: switch  Space: grab/release  Arrows/Q/E: move".to_string()];
    for (name, placeable, held, controlled) in &placeables {
        let marker = if controlled { ">" } else { " " };
        let status = match placeable.placer() {
            None => "binding slots".to_string(),
            Some(placer) => match placer.placed_slot() {
                Some(slot) => {
                    let slot = Entity::from_bits(slot.0);
                    match names.get(slot) {
                        Ok(slot_name) => format!("placed in {}", slot_name),
                        Err(_) => format!("placed in {}", slot),
                    }
                }
                None if held.0 => "held".to_string(),
                None => "free".to_string(),
            },
        };
        lines.push(format!("{} {} [{:?}] {}", marker, name, placeable.mode, status));
    }
    text.0 = lines.join("\n");
}
