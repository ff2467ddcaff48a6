use std::path::PathBuf;
use std::process;

use log::error;
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(name = "twitchbot", about = "A Twitch chatbot answering chat commands with canned responses")]
struct Opt {
    /// Config file
    #[structopt(short, long, parse(from_os_str))]
    config: PathBuf,

    /// Print the OAuth authorization URL and exit
    #[structopt(short = "p", long)]
    print_oauth_url: bool,
}

fn run(opt: Opt) -> Result<(), bot::Error> {
    let cfg = bot::config::load(&opt.config)?;

    if opt.print_oauth_url {
        let url = bot::api::authorize_url(
            &cfg.credentials.client_id,
            &cfg.credentials.redirect_uri,
            &cfg.credentials.scope,
        );
        println!("Visit: {}", url);
        println!("1. Allow Access");
        println!("2. Copy OAuth access_token From Redirect URL");
        return Ok(());
    }

    bot::run(cfg)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opt = Opt::from_args();
    if let Err(err) = run(opt) {
        error!("{}", err);
        process::exit(1);
    }
}
