use fixprep::cli::{self, TaskVerb};
use fixprep::config::ExperimentConfig;
use fixprep::driver::RunscriptRunner;
use fixprep::tasks;

fn run() -> Result<(), String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() || args[0] == "--help" || args[0] == "help" {
        println!("{}", cli::help_lines().join("\n"));
        return Ok(());
    }

    let task = cli::parse_args(&args).map_err(|err| err.to_string())?;
    let config = ExperimentConfig::from_path(&task.config_file).map_err(|err| err.to_string())?;
    let runner = RunscriptRunner;

    let outcome = match task.verb {
        TaskVerb::MakeGrid => tasks::make_grid::run(&config, &task.key_path, &runner),
        TaskVerb::MakeOrog => tasks::make_orog::run(&config, &task.key_path, &runner),
        TaskVerb::MakeSfcClimo => tasks::make_sfc_climo::run(&config, &task.key_path, &runner),
        TaskVerb::CreateModelConfigure => match task.cycle {
            Some(cycle) => tasks::model_configure::run(&config, &task.key_path, cycle),
            None => return Err("create-model-configure requires --cycle".to_string()),
        },
        TaskVerb::Upp => match (task.cycle, task.leadtime) {
            (Some(cycle), Some(leadtime)) => tasks::upp::run(
                &config,
                &task.key_path,
                cycle,
                leadtime,
                &task.member,
                &runner,
            ),
            _ => return Err("upp requires --cycle and --leadtime".to_string()),
        },
    };
    outcome.map_err(|err| err.to_string())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
