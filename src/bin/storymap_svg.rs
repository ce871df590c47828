use std::fs;
use std::path::PathBuf;

use storymap::api::{
    ENCODED_STEP_COUNT, PageLayout, StepAnchor, StoryConfig, StoryMap, ViewportMode,
};
use storymap::core::Viewport;
use storymap::data::GeoJsonFiles;
use storymap::render::SvgRenderer;

const USAGE: &str = "usage: storymap_svg --regions <path> --points <path> --output <dir> \
[--width <px>] [--height <px>] [--config <path>] [--object <topology object>]";

/// Sample time far enough past each step entry for every transition to settle.
const SETTLE_MS: f64 = 5_000.0;

#[derive(Debug)]
struct CliArgs {
    regions: PathBuf,
    points: PathBuf,
    output: PathBuf,
    width: u32,
    height: u32,
    config: Option<PathBuf>,
    object: Option<String>,
}

fn main() {
    let _ = storymap::telemetry::init_default_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = parse_args()?;
    let config = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .map_err(|e| format!("failed to read config {}: {e}", path.display()))?;
            StoryConfig::from_json_str(&raw).map_err(|e| e.to_string())?
        }
        None => StoryConfig::default(),
    };

    let layout = page_layout(args.width, args.height);
    let mut source =
        GeoJsonFiles::new(&args.regions, &args.points).with_fields(config.fields.clone());
    if let Some(object) = &args.object {
        source = source.with_topology_object(object.clone());
    }
    let mut map = StoryMap::load(&source, config, &layout).map_err(|e| e.to_string())?;

    fs::create_dir_all(&args.output)
        .map_err(|e| format!("failed to create {}: {e}", args.output.display()))?;

    let mut written = 0usize;
    match map.mode() {
        ViewportMode::Desktop => {
            for step in 0..ENCODED_STEP_COUNT {
                let entered_at = step as f64 * SETTLE_MS;
                map.enter_step(step, entered_at);
                let mut renderer = SvgRenderer::new();
                map.render(0, &mut renderer, entered_at + SETTLE_MS)
                    .map_err(|e| e.to_string())?;
                write_svg(&args.output, step, &renderer.into_document())?;
                written += 1;
            }
        }
        ViewportMode::Mobile => {
            for step in 0..map.controller().step_count() {
                let mut renderer = SvgRenderer::new();
                if map
                    .render(step, &mut renderer, 0.0)
                    .map_err(|e| e.to_string())?
                {
                    write_svg(&args.output, step, &renderer.into_document())?;
                    written += 1;
                }
            }
        }
    }

    println!(
        "wrote {written} {:?} step snapshots to {}",
        map.mode(),
        args.output.display()
    );
    Ok(())
}

/// Stacks one viewport-high step element per encoded step below the map.
fn page_layout(width: u32, height: u32) -> PageLayout {
    let viewport_height = f64::from(height);
    PageLayout {
        window_width: width,
        viewport_height,
        map_container: Viewport::new(width, height),
        step_anchors: (0..ENCODED_STEP_COUNT)
            .map(|step| StepAnchor::new(viewport_height * (step as f64 + 1.0), viewport_height))
            .collect(),
        step_containers: vec![Viewport::new(width, height); ENCODED_STEP_COUNT],
    }
}

fn write_svg(dir: &std::path::Path, step: usize, document: &str) -> Result<(), String> {
    let path = dir.join(format!("step-{step}.svg"));
    fs::write(&path, document).map_err(|e| format!("failed to write {}: {e}", path.display()))
}

fn parse_args() -> Result<CliArgs, String> {
    let mut args = std::env::args().skip(1);
    let mut regions = None::<PathBuf>;
    let mut points = None::<PathBuf>;
    let mut output = None::<PathBuf>;
    let mut config = None::<PathBuf>;
    let mut object = None::<String>;
    let mut width = 960_u32;
    let mut height = 600_u32;

    while let Some(flag) = args.next() {
        let mut value = |name: &str| {
            args.next()
                .ok_or_else(|| format!("missing value for {name}"))
        };
        match flag.as_str() {
            "--regions" => regions = Some(PathBuf::from(value("--regions")?)),
            "--points" => points = Some(PathBuf::from(value("--points")?)),
            "--output" => output = Some(PathBuf::from(value("--output")?)),
            "--config" => config = Some(PathBuf::from(value("--config")?)),
            "--object" => object = Some(value("--object")?),
            "--width" => width = parse_px(&value("--width")?, "--width")?,
            "--height" => height = parse_px(&value("--height")?, "--height")?,
            "-h" | "--help" => return Err(USAGE.to_owned()),
            _ => return Err(format!("unknown argument `{flag}`")),
        }
    }

    Ok(CliArgs {
        regions: regions.ok_or_else(|| "missing --regions".to_owned())?,
        points: points.ok_or_else(|| "missing --points".to_owned())?,
        output: output.ok_or_else(|| "missing --output".to_owned())?,
        width,
        height,
        config,
        object,
    })
}

fn parse_px(raw: &str, flag: &str) -> Result<u32, String> {
    raw.parse::<u32>()
        .map_err(|e| format!("invalid value `{raw}` for {flag}: {e}"))
}
