use adaptor_cli::commands::execute;
use adaptor_cli::config::Config;
use clap::Parser;

fn main() {
    env_logger::init();
    let config: Config = Config::parse();
    let (global_options, command) = config.to_parts();

    match execute(command, global_options) {
        Ok(result) => {
            println!("{}", result.output.as_str());
            if !result.success {
                std::process::exit(1);
            }
        }
        Err(err) => {
            eprintln!("** Error ** \n {err}");
            std::process::exit(1);
        }
    }
}
