use std::net::Ipv4Addr;

use crate::error::Error;

const HOSTS_FILE: &str = "/etc/hosts";

/// Reads /etc/hosts and returns the address of the first host entry.
/// Inside a container this is expected to be the public IP of the host.
pub fn public_ip_from_hosts() -> Result<String, Error> {
    let contents =
        std::fs::read_to_string(HOSTS_FILE).map_err(|e| Error::Other(e.to_string()))?;
    first_ipv4(&contents)
        .map(|ip| ip.to_string())
        .ok_or_else(|| Error::InvalidInput("no valid host line in hosts file".to_string()))
}

fn first_ipv4(contents: &str) -> Option<Ipv4Addr> {
    contents
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .find_map(|token| token.parse::<Ipv4Addr>().ok())
}
