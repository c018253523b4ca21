use std::process::ExitCode;

use unicornleap::{
    LeapConfig, LeapImage, Parsed, SoftwareCompositor, Stage, UnicornError,
    cli,
    compositor::Layer,
    images, leap,
    term::{NullSurface, Surface, TerminalSurface},
};

const FPS: u32 = 30;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let config = match cli::parse(&args) {
        Ok(Parsed::Help) => {
            println!("{}", cli::usage());
            return ExitCode::SUCCESS;
        }
        Ok(Parsed::Run(config)) => config,
        Err(UnicornError::Usage(errors)) => {
            println!("{}\n", errors.join("\n"));
            println!("{}", cli::usage());
            return ExitCode::from(1);
        }
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(1);
        }
    };

    // All image validation happens before any animation is scheduled.
    let Some(unicorn) = LeapImage::load(&images::resolve(&config.unicorn)) else {
        println!("{}", UnicornError::image(config.unicorn.as_str()));
        return ExitCode::from(127);
    };
    let sparkle = match &config.sparkle {
        Some(filename) => match LeapImage::load(&images::resolve(filename)) {
            Some(image) => Some(image),
            None => {
                println!("{}", UnicornError::image(filename.as_str()));
                return ExitCode::from(127);
            }
        },
        None => None,
    };
    let layer = Layer {
        image: unicorn,
        sparkle,
    };

    if config.verbose {
        // Scheduling and completion events go to stderr; stdout belongs to
        // the alternate screen once the animation starts.
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    }

    // Printed before the alternate screen takes over stdout.
    if config.verbose && !config.herd {
        println!("Seconds: {}", config.seconds);
        println!("Number: {}", config.number);
    }

    match run(&config, &layer) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(config: &LeapConfig, layer: &Layer) -> unicornleap::UnicornResult<()> {
    let surface: Box<dyn Surface> = match TerminalSurface::new() {
        Ok(term) => Box::new(term),
        // No terminal attached; animate into the void so timing still holds.
        Err(_) => Box::new(NullSurface::new(320, 96)),
    };
    let (width, height) = surface.size();
    let stage = Stage::new(f64::from(width), f64::from(height))?;
    let mut compositor = SoftwareCompositor::new(surface, FPS);

    if config.herd {
        leap::herd(config, stage, layer, &mut compositor)
    } else {
        leap::leap(config, stage, layer, &mut compositor)
    }
}
