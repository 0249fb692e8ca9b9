use get_if_addrs::get_if_addrs;
use std::collections::BTreeMap;
use std::net::UdpSocket;

/// Devine l'adresse IP locale de la machine.
///
/// Crée un socket UDP et le « connecte » vers `8.8.8.8:80` : aucun paquet
/// n'est émis, mais le système choisit l'interface de sortie, dont on lit
/// l'adresse. Retourne `127.0.0.1` si l'une des étapes échoue.
///
/// # Examples
///
/// ```
/// let ip = ambutils::guess_local_ip();
/// assert!(!ip.is_empty());
/// ```
pub fn guess_local_ip() -> String {
    match UdpSocket::bind("0.0.0.0:0") {
        Ok(socket) => {
            if socket.connect("8.8.8.8:80").is_ok() {
                if let Ok(local_addr) = socket.local_addr() {
                    return local_addr.ip().to_string();
                }
            }
            "127.0.0.1".to_string()
        }
        Err(_) => "127.0.0.1".to_string(),
    }
}

/// Liste les adresses IPv4 non-loopback, par nom d'interface.
///
/// Utilisé au démarrage pour afficher toutes les URLs sous lesquelles les
/// chanteurs peuvent joindre le serveur. Une erreur d'énumération donne
/// simplement une table vide.
pub fn lan_addresses() -> BTreeMap<String, Vec<String>> {
    let mut result = BTreeMap::new();

    if let Ok(interfaces) = get_if_addrs() {
        for iface in interfaces {
            let ip = iface.ip();
            if ip.is_loopback() || !ip.is_ipv4() {
                continue;
            }
            let addresses: &mut Vec<String> = result.entry(iface.name).or_default();
            let ip = ip.to_string();
            if !addresses.contains(&ip) {
                addresses.push(ip);
            }
        }
    }

    result
}
