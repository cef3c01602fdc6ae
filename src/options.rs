//! Command-line options for the window binary.

use clap::{Parser, ValueEnum};

use crate::{
    colour::Palette,
    config::Config,
    grid,
    viewport::Viewport,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// 15 iterations.
    Coarse,
    /// 200 iterations.
    Detailed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PaletteOption {
    Reference,
    Smooth,
}

impl From<PaletteOption> for Palette {
    fn from(option: PaletteOption) -> Self {
        match option {
            PaletteOption::Reference => Palette::Reference,
            PaletteOption::Smooth => Palette::Smooth,
        }
    }
}

/// Render the Mandelbrot set in a window.
#[derive(Debug, Parser)]
#[command(name = "mandelbrot-field", version)]
pub struct Options {
    /// Starting configuration; the options below override it.
    #[arg(long, value_enum, default_value_t = Preset::Coarse)]
    pub preset: Preset,

    #[arg(long)]
    pub max_iterations: Option<u32>,

    #[arg(long, allow_hyphen_values = true)]
    pub escape_radius_squared: Option<f32>,

    /// `x_min,x_max,y_min,y_max`
    #[arg(long, allow_hyphen_values = true, value_parser = parse_viewport)]
    pub viewport: Option<Viewport>,

    #[arg(long, value_enum)]
    pub palette: Option<PaletteOption>,

    /// Threads evaluating the grid.
    #[arg(long, default_value_t = grid::default_workers())]
    pub workers: usize,
}

impl Options {
    /// The preset with every given override applied. Not yet validated.
    pub fn config(&self) -> Config {
        let mut config = match self.preset {
            Preset::Coarse => Config::coarse(),
            Preset::Detailed => Config::detailed(),
        };
        if let Some(max_iterations) = self.max_iterations {
            config = config.with_max_iterations(max_iterations);
        }
        if let Some(escape_radius_squared) = self.escape_radius_squared {
            config = config.with_escape_radius_squared(escape_radius_squared);
        }
        if let Some(viewport) = self.viewport {
            config = config.with_viewport(viewport);
        }
        if let Some(palette) = self.palette {
            config = config.with_palette(palette.into());
        }
        config
    }
}

fn parse_viewport(value: &str) -> Result<Viewport, String> {
    let bounds = value
        .split(',')
        .map(|bound| bound.trim().parse::<f32>())
        .collect::<Result<Vec<f32>, _>>()
        .map_err(|error| error.to_string())?;

    match bounds[..] {
        [x_min, x_max, y_min, y_max] => Ok(Viewport::new(x_min, x_max, y_min, y_max)),
        _ => Err(format!("expected 4 comma-separated bounds, got {}", bounds.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::ConfigError, evaluator::Evaluator};

    fn parse(args: &[&str]) -> Options {
        Options::try_parse_from(std::iter::once("mandelbrot-field").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn defaults_to_coarse_preset() {
        let options = parse(&[]);
        assert_eq!(options.config(), Config::coarse());
        assert_eq!(options.workers, grid::default_workers());
    }

    #[test]
    fn overrides_apply_on_top_of_preset() {
        let options = parse(&[
            "--preset",
            "detailed",
            "--escape-radius-squared",
            "16",
            "--viewport",
            "-1.5,0.5,-1,1",
            "--palette",
            "smooth",
            "--workers",
            "2",
        ]);
        let config = options.config();
        assert_eq!(config.max_iterations, 200);
        assert_eq!(config.escape_radius_squared, 16.0);
        assert_eq!(config.viewport, Viewport::new(-1.5, 0.5, -1.0, 1.0));
        assert_eq!(config.palette, Palette::Smooth);
        assert_eq!(options.workers, 2);
    }

    #[test]
    fn invalid_values_reach_config_validation() {
        let options = parse(&["--max-iterations", "0"]);
        assert_eq!(
            Evaluator::new(options.config()).unwrap_err(),
            ConfigError::ZeroIterations
        );

        let options = parse(&["--escape-radius-squared", "-4"]);
        assert_eq!(
            Evaluator::new(options.config()).unwrap_err(),
            ConfigError::EscapeRadius(-4.0)
        );

        let options = parse(&["--viewport", "1,-2.5,-1,1"]);
        assert!(matches!(
            Evaluator::new(options.config()),
            Err(ConfigError::Viewport(_))
        ));
    }

    #[test]
    fn malformed_viewport_is_a_usage_error() {
        for viewport in ["1,2,3", "a,b,c,d", "1,2,3,4,5"] {
            let result = Options::try_parse_from(["mandelbrot-field", "--viewport", viewport]);
            assert!(result.is_err(), "{viewport}");
        }
        assert!(Options::try_parse_from(["mandelbrot-field", "--preset", "fine"]).is_err());
    }
}
