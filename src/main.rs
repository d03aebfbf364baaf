//! `tilt [model.glb] [options.toml]`: open a window showing one model.

use std::path::Path;

use tilt::{options::Options, Viewer};

const DEFAULT_MODEL: &str = "assets/hed-0.glb";

fn load_options(path: Option<&str>) -> Options {
    let Some(path) = path else {
        return Options::default();
    };
    match Options::load(Path::new(path)) {
        Ok(options) => {
            log::info!("using options from {path}");
            options
        }
        Err(e) => {
            log::error!("ignoring options file {path}: {e}");
            Options::default()
        }
    }
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let model = args.next().unwrap_or_else(|| DEFAULT_MODEL.to_owned());
    let options = load_options(args.next().as_deref());

    let result = Viewer::builder()
        .with_model_path(model)
        .with_options(options)
        .build()
        .run();

    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}
