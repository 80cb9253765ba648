use std::env;
use std::fs;

use tangram_core::{EngineConfig, EngineError, PuzzleDefinition, PuzzleSession, is_blocked, world_points};
use tangram_thumbnail::{ThumbnailStyle, encode_png, render_thumbnail};

const THUMB_W: u32 = 200;
const THUMB_H: u32 = 160;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: tangram <puzzle.json> [thumbnail.png] [config.json]");
        std::process::exit(2);
    }
    let input = &args[1];
    let thumb_path = args.get(2);
    let config = match args.get(3) {
        Some(path) => EngineConfig::from_path(path)?,
        None => EngineConfig::default(),
    };

    let txt = fs::read_to_string(input)?;
    let def = PuzzleDefinition::from_json_str(&txt)?;
    let name = if def.name.is_empty() {
        input.clone()
    } else {
        def.name.clone()
    };
    tracing::info!(puzzle = %name, targets = def.targets.len(), "loaded puzzle");

    let mut session = def.into_session(config)?;
    println!("{}", report(&mut session, &name)?);

    if let Some(out) = thumb_path {
        let pixmap = render_thumbnail(
            session.targets(),
            session.pieces(),
            THUMB_W,
            THUMB_H,
            &ThumbnailStyle::default(),
        )?;
        fs::write(out, encode_png(&pixmap)?)?;
        tracing::info!(path = %out, "thumbnail written");
    }
    Ok(())
}

/// Snap every piece where it lies, then list blocking pairs and completion.
fn report(session: &mut PuzzleSession, name: &str) -> Result<String, EngineError> {
    let mut out = format!("puzzle: {name}\n");
    let ids: Vec<u32> = session.pieces().iter().map(|p| p.id).collect();
    for id in &ids {
        let snapped = session.release(*id)?;
        if let Some(p) = session.piece(*id) {
            out.push_str(&format!(
                "piece {:>3}  {:<8} at ({:.1}, {:.1}) rot {:.1}\n",
                id,
                if snapped { "placed" } else { "loose" },
                p.pose.position.x,
                p.pose.position.y,
                p.pose.rotation,
            ));
        }
    }

    let threshold = session.config().collision.allow_threshold;
    let pieces = session.pieces();
    for (i, a) in pieces.iter().enumerate() {
        let world_a = world_points(a);
        for b in &pieces[i + 1..] {
            let world_b = vec![world_points(b)];
            if is_blocked(&world_a, &world_b, a.area(), threshold) {
                out.push_str(&format!("blocked: piece {} against piece {}\n", a.id, b.id));
            }
        }
    }

    out.push_str(&format!("completion: {}%", session.completion()));
    Ok(out)
}
