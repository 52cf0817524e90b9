use log::{debug, error, info, warn};
use std::fs;
use std::io::{BufReader, BufWriter, Read, Write};
use std::net::TcpStream;
use std::path::{Path, PathBuf};

use super::http_status::HttpStatus;

static MIME_TYPES: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("css", "text/css"),
    ("js", "application/javascript"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    ("json", "application/json"),
    ("txt", "text/plain"),
];

pub fn handle_client(mut stream: TcpStream, serving_root: &Path) {
    let peer_addr = match stream.peer_addr() {
        Ok(addr) => addr.to_string(),
        Err(_) => "unknown".to_string(),
    };

    debug!("Handling request from {}", peer_addr);

    let mut buffer = [0u8; 8192];
    let bytes_read = match stream.read(&mut buffer) {
        Ok(0) => {
            debug!("Connection closed by client {}", peer_addr);
            return;
        }
        Ok(n) => n,
        Err(e) => {
            error!("Error reading from {}: {}", peer_addr, e);
            return;
        }
    };

    let request = String::from_utf8_lossy(&buffer[..bytes_read]);
    let first_line: Vec<&str> = match request.lines().next() {
        Some(line) => line.split_whitespace().collect(),
        None => {
            send_error(&mut stream, HttpStatus::BadRequest);
            return;
        }
    };

    if first_line.len() < 2 {
        send_error(&mut stream, HttpStatus::BadRequest);
        return;
    }

    let method = first_line[0];
    let target = first_line[1];

    let file_path = match resolve_target(target, serving_root) {
        Ok(path) => path,
        Err(status) => {
            if status == HttpStatus::Forbidden {
                warn!("Path traversal attempt from {}: {}", peer_addr, target);
            } else {
                warn!("Malformed request target from {}: {}", peer_addr, target);
            }
            send_error(&mut stream, status);
            return;
        }
    };

    match method {
        "GET" | "HEAD" => serve_file(&mut stream, &file_path, method == "HEAD", &peer_addr),
        _ => {
            warn!("Unsupported method from {}: {}", peer_addr, method);
            send_error(&mut stream, HttpStatus::MethodNotAllowed);
        }
    }
}

/// Maps a request target to a path under the serving root. The query string
/// takes no part in resolution; a target addressing a directory resolves to
/// the index file beneath it.
fn resolve_target(target: &str, serving_root: &Path) -> Result<PathBuf, HttpStatus> {
    let path = match target.find('?') {
        Some(index) => &target[..index],
        None => target,
    };
    let path = path.replace("%20", " ");

    if path.contains("..") {
        return Err(HttpStatus::Forbidden);
    }

    let Some(relative) = path.strip_prefix('/') else {
        return Err(HttpStatus::BadRequest);
    };

    if relative.is_empty() || relative.ends_with('/') {
        Ok(serving_root.join(relative).join("index.html"))
    } else {
        Ok(serving_root.join(relative))
    }
}

fn serve_file(stream: &mut TcpStream, file_path: &Path, is_head: bool, peer_addr: &str) {
    if !file_path.exists() {
        info!("File not found for {}: {:?}", peer_addr, file_path);
        send_error(stream, HttpStatus::NotFound);
        return;
    }

    if !file_path.is_file() {
        warn!("Attempt to access non-file from {}: {:?}", peer_addr, file_path);
        send_error(stream, HttpStatus::Forbidden);
        return;
    }

    let metadata = match fs::metadata(file_path) {
        Ok(meta) => meta,
        Err(e) => {
            error!("Error getting metadata for {:?}: {}", file_path, e);
            send_error(stream, HttpStatus::InternalServerError);
            return;
        }
    };

    let content_type = content_type_for(file_path);
    let headers = format!(
        "{}Content-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        HttpStatus::Ok.as_response_line(),
        content_type,
        metadata.len()
    );

    if is_head {
        if let Err(e) = stream.write_all(headers.as_bytes()) {
            error!("Error sending HEAD response to {}: {}", peer_addr, e);
            return;
        }
    } else {
        match fs::File::open(file_path) {
            Ok(file) => {
                let mut reader = BufReader::new(file);
                let mut writer = BufWriter::new(stream);

                if let Err(e) = writer.write_all(headers.as_bytes()) {
                    error!("Error sending headers to {}: {}", peer_addr, e);
                    return;
                }

                let mut buffer = [0u8; 8192];
                loop {
                    match reader.read(&mut buffer) {
                        Ok(0) => break,
                        Ok(n) => {
                            if let Err(e) = writer.write_all(&buffer[..n]) {
                                error!("Error sending file data to {}: {}", peer_addr, e);
                                break;
                            }
                        }
                        Err(e) => {
                            error!("Error reading file for {}: {}", peer_addr, e);
                            break;
                        }
                    }
                }

                if let Err(e) = writer.flush() {
                    error!("Error flushing stream for {}: {}", peer_addr, e);
                }
            }
            Err(e) => {
                error!("Error opening file {:?} for {}: {}", file_path, peer_addr, e);
                send_error(stream, HttpStatus::InternalServerError);
                return;
            }
        }
    }

    info!(
        "Served file to {}: {:?} ({} bytes)",
        peer_addr,
        file_path,
        metadata.len()
    );
}

fn content_type_for(file_path: &Path) -> &'static str {
    let ext = file_path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    MIME_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
        .unwrap_or("application/octet-stream")
}

fn send_error(stream: &mut TcpStream, status: HttpStatus) {
    let body = match status {
        HttpStatus::BadRequest => "<html><body><h1>400 Bad Request</h1></body></html>",
        HttpStatus::Forbidden => "<html><body><h1>403 Forbidden</h1></body></html>",
        HttpStatus::NotFound => "<html><body><h1>404 Not Found</h1></body></html>",
        HttpStatus::MethodNotAllowed => {
            "<html><body><h1>405 Method Not Allowed</h1></body></html>"
        }
        HttpStatus::InternalServerError => {
            "<html><body><h1>500 Internal Server Error</h1></body></html>"
        }
        _ => "<html><body><h1>Error</h1></body></html>",
    };

    let response = format!(
        "{}Content-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status.as_response_line(),
        body.len(),
        body
    );

    if let Err(e) = stream.write_all(response.as_bytes()) {
        error!("Error sending response: {}", e);
    }
}
