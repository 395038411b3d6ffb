use assert_cmd::cargo_bin;
use std::fs::File;
use std::io::Error;
use std::net::TcpStream;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::Duration;

use rand::Rng;

/// A running engine server on a random local port, killed on drop.
pub struct ServerGuard {
    child: Child,
    pub addr: String,
}

impl ServerGuard {
    pub fn spawn() -> ServerGuard {
        for _ in 0..5 {
            let port = rand::thread_rng().gen_range(20000..60000);
            let addr = format!("127.0.0.1:{port}");
            let mut child = Command::new(cargo_bin!("greengrocer-server"))
                .args(["--listen", &addr])
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
                .expect("failed to start greengrocer-server");

            // Wait until the port accepts connections or the child dies
            // (most likely a port collision, so try another one).
            for _ in 0..50 {
                if TcpStream::connect(addr.as_str()).is_ok() {
                    return ServerGuard { child, addr };
                }
                if child
                    .try_wait()
                    .expect("failed to poll greengrocer-server")
                    .is_some()
                {
                    break;
                }
                thread::sleep(Duration::from_millis(50));
            }

            let _ = child.kill();
            let _ = child.wait();
        }
        panic!("greengrocer-server did not come up on any port");
    }
}

impl Drop for ServerGuard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub fn generate_price_csv(path: &Path, rows: &[(&str, &str, &str)]) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["id", "name", "price_per_kg"])?;
    for (id, name, price) in rows {
        wtr.write_record([*id, *name, *price])?;
    }

    wtr.flush()?;
    Ok(())
}
