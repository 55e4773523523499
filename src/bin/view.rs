//! Interactive first-person viewer.
//!
//! ```bash
//! cargo run --release -- [level.txt]
//! ```
//!
//! WASD / arrows move and turn, Shift runs, Space fires a hitscan,
//! Escape quits. Without a level file the built-in test level loads.

use std::time::Instant;

use clap::Parser;
use glam::Vec2;
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use gridcast::{
    renderer::{Billboard, FrameRenderer, RenderConfig},
    sim::{EntityRef, HitKind, hitscan},
    world::{GridMap, LevelData, Pose, Texture, TextureBank},
};

const MOVE_SPEED: f32 = 3.0;
const RUN_SPEED: f32 = 5.0;
const STRAFE_SPEED: f32 = 2.5;
const ROT_SPEED: f32 = 2.0;
const FIRE_RANGE: f32 = 20.0;

#[derive(Parser)]
#[command(about = "First-person viewer for grid levels")]
struct Args {
    /// Level file; the built-in test level when omitted.
    level: Option<std::path::PathBuf>,

    #[arg(long, default_value_t = 1024)]
    width: usize,

    #[arg(long, default_value_t = 768)]
    height: usize,

    /// Horizontal field of view in degrees.
    #[arg(long, default_value_t = 60.0)]
    fov: f32,
}

/// Demo-side enemy state behind the core's `EntityRef` handles.
struct Enemy {
    kind: String,
    entity: EntityRef,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let level = match &args.level {
        Some(path) => LevelData::parse(&std::fs::read_to_string(path)?)?,
        None => LevelData::fallback(),
    };

    let cfg = RenderConfig {
        width: args.width,
        height: args.height,
        fov: args.fov.to_radians(),
        ..RenderConfig::default()
    };

    let bank = demo_textures();
    let mut renderer = FrameRenderer::new(cfg);
    let mut pose = Pose::new(level.player_start, 0.0);

    let mut enemies: Vec<Enemy> = level
        .enemies
        .iter()
        .enumerate()
        .map(|(i, s)| Enemy {
            kind: s.kind.clone(),
            entity: EntityRef {
                pos: s.pos,
                radius: enemy_radius(&s.kind),
                alive: true,
                id: i as u32,
            },
        })
        .collect();

    let mut win = Window::new("gridcast", cfg.width, cfg.height, WindowOptions::default())?;
    win.set_target_fps(60);

    let start = Instant::now();
    let mut last = Instant::now();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let dt = last.elapsed().as_secs_f32();
        last = Instant::now();

        /* movement --------------------------------------------------- */
        let speed = if win.is_key_down(Key::LeftShift) {
            RUN_SPEED
        } else {
            MOVE_SPEED
        };
        let mut forward = 0.0;
        if win.is_key_down(Key::W) || win.is_key_down(Key::Up) {
            forward += speed;
        }
        if win.is_key_down(Key::S) || win.is_key_down(Key::Down) {
            forward -= speed;
        }
        let mut strafe = 0.0;
        if win.is_key_down(Key::A) {
            strafe -= STRAFE_SPEED;
        }
        if win.is_key_down(Key::D) {
            strafe += STRAFE_SPEED;
        }
        if win.is_key_down(Key::Left) {
            pose.turn(ROT_SPEED * dt);
        }
        if win.is_key_down(Key::Right) {
            pose.turn(-ROT_SPEED * dt);
        }
        let delta = (pose.forward() * forward + pose.right() * strafe) * dt;
        try_move(&level.grid, &mut pose, delta);

        /* fire ------------------------------------------------------- */
        if win.is_key_pressed(Key::Space, KeyRepeat::No) {
            let ents: Vec<EntityRef> = enemies.iter().map(|e| e.entity).collect();
            if let Some(hit) = hitscan(
                &level.grid,
                pose.pos(),
                pose.angle(),
                FIRE_RANGE,
                cfg.hitscan_step,
                &ents,
            ) {
                if let HitKind::Entity(id) = hit.kind {
                    let e = &mut enemies[id as usize];
                    e.entity.alive = false;
                    log::info!("{} killed at {:.1} cells", e.kind, hit.distance);
                }
            }
        }

        /* draw ------------------------------------------------------- */
        let mut boards: Vec<Billboard> = enemies
            .iter()
            .filter(|e| e.entity.alive)
            .map(|e| Billboard {
                pos: e.entity.pos,
                depth_override: None,
                image_key: format!("{}_walk1", e.kind),
                facing_independent: false,
            })
            .collect();
        boards.extend(level.items.iter().map(|s| Billboard {
            pos: s.pos,
            depth_override: None,
            image_key: s.kind.clone(),
            facing_independent: true,
        }));

        let fb = renderer.frame(
            &level.grid,
            pose,
            &boards,
            &bank,
            start.elapsed().as_secs_f32(),
        );
        win.update_with_buffer(fb, cfg.width, cfg.height)?;
    }
    Ok(())
}

/// Slide along walls by testing each axis on its own.
fn try_move(grid: &GridMap, pose: &mut Pose, delta: Vec2) {
    let p = pose.pos();
    let mut next = p;
    if !grid.is_wall((p.x + delta.x).floor() as i32, p.y.floor() as i32) {
        next.x += delta.x;
    }
    if !grid.is_wall(next.x.floor() as i32, (p.y + delta.y).floor() as i32) {
        next.y += delta.y;
    }
    pose.set_pos(next);
}

fn enemy_radius(kind: &str) -> f32 {
    match kind {
        "imp" => 0.4,
        "demon" => 0.6,
        _ => 0.5,
    }
}

/// Procedural stand-ins for decoded wall art.
fn demo_textures() -> TextureBank {
    let mut bank = TextureBank::new();
    bank.insert("wall1", brick(0xFF_B03020, 0xFF_703020))
        .expect("fresh bank");
    bank.insert("wall2", brick(0xFF_308030, 0xFF_204020))
        .expect("fresh bank");
    bank.insert("door", planks(0xFF_806030, 0xFF_503C20))
        .expect("fresh bank");
    bank
}

fn brick(face: u32, mortar: u32) -> Texture {
    const N: usize = 64;
    let mut pixels = vec![face; N * N];
    for y in 0..N {
        for x in 0..N {
            let course = y / 8;
            let shift = if course % 2 == 0 { 0 } else { 8 };
            if y % 8 == 0 || (x + shift) % 16 == 0 {
                pixels[y * N + x] = mortar;
            }
        }
    }
    Texture {
        w: N,
        h: N,
        pixels,
    }
}

fn planks(wood: u32, seam: u32) -> Texture {
    const N: usize = 64;
    let mut pixels = vec![wood; N * N];
    for y in 0..N {
        for x in 0..N {
            if x % 16 == 0 || y == 0 || y == N - 1 {
                pixels[y * N + x] = seam;
            }
        }
    }
    Texture {
        w: N,
        h: N,
        pixels,
    }
}
