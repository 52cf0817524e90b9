use std::env;
use std::process::ExitCode;

use clap::Parser;
use log::info;
use ui_server::logger;
use ui_server::server::config::ServerConfig;
use ui_server::server::{HttpServer, signal};

fn main() -> ExitCode {
    logger::init();

    let config = ServerConfig::parse();
    info!("Starting static file server with config: {:?}", config);

    let serving_root = match env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Server error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let shutdown = match signal::install() {
        Ok(flag) => flag,
        Err(e) => {
            eprintln!("Server error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let server = match HttpServer::bind(&config, serving_root) {
        Ok(server) => server,
        Err(e) => {
            eprintln!("Server error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!(
        "Serving HTTP on localhost port {} (http://localhost:{}/) ...",
        config.port, config.port
    );

    match server.run(shutdown) {
        Ok(()) => {
            println!("Server stopped by user");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
