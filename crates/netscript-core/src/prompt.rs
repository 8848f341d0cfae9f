//! Prompt construction for the generation, explanation and chat calls.
//!
//! Everything here is pure: the same configuration always yields the same
//! text, and nothing is validated beyond what the types already enforce.

use sha2::{Digest, Sha256};

use crate::config::ScriptConfig;

/// Default number of characters of a script sent for explanation.
pub const DEFAULT_EXPLAIN_PREFIX_CHARS: usize = 3000;

/// Greeting shown as the first message of every chat session.
pub const CHAT_GREETING: &str = "Hello! I'm your Python Network Assistant. I can help you modify scripts or explain networking concepts. How can I help you today?";

/// System instruction for the chat assistant.
pub const CHAT_SYSTEM_INSTRUCTION: &str = "You are an expert Python Scripting Assistant for Network Engineering.

YOUR GOAL: Help users write efficient, cross-platform Python scripts for network tasks.

TECHNICAL RULES:
1. Prioritize 'scapy' for packet manipulation and 'bleak' for Bluetooth.
2. Recommend 'nmap' integration for advanced scanning.
3. Ensure code is compatible with Windows, Linux, and macOS.
4. Use 'asyncio' for performance where possible.
5. Respect Offline vs Online boundaries. Only suggest internet APIs if the user explicitly asks for online features.

Keep responses concise and code-focused.";

/// Install command for the libraries a generated script imports.
pub const INSTALL_COMMAND: &str = "pip install scapy bleak requests colorama python-nmap";

/// Build the script generation prompt for a configuration.
pub fn build_script_prompt(config: &ScriptConfig) -> String {
    let mut prompt = String::with_capacity(6 * 1024);

    prompt.push_str("You are an expert Python Network Security Engineer.\n");
    prompt.push_str("Create a single, robust, cross-platform Python script to scan nearby devices via WiFi (ARP) and Bluetooth (BLE).\n\n");

    push_configuration(&mut prompt, config);
    prompt.push('\n');
    prompt.push_str("**Critical Technical Requirements:**\n");
    push_platform_section(&mut prompt, config);
    push_concurrency_section(&mut prompt);
    push_device_data_section(&mut prompt);
    push_deep_scan_section(&mut prompt, config);
    push_port_section(&mut prompt, config);
    push_report_section(&mut prompt, config);
    push_online_section(&mut prompt, config);
    push_error_handling_section(&mut prompt);
    push_header_section(&mut prompt);
    push_output_format(&mut prompt);

    prompt
}

fn push_configuration(prompt: &mut String, config: &ScriptConfig) {
    prompt.push_str("**Configuration:**\n");
    prompt.push_str(&format!("- Scan WiFi/LAN: {}\n", config.scan_wifi));
    prompt.push_str(&format!("- Scan Bluetooth: {}\n", config.scan_bluetooth));
    prompt.push_str(&format!("- Show MAC: {}\n", config.include_mac));
    prompt.push_str(&format!("- Target OS: {}\n", config.os_target));
    prompt.push_str(&format!("- Timeout: {}s\n", config.scan_timeout));
    prompt.push_str(&format!("- Deep Scan Mode: {}\n", config.deep_scan));
    prompt.push_str(&format!("- Scan Ports: {}\n", config.scan_ports));
    prompt.push_str(&format!("- Port Target: {}\n", config.port_range));
    prompt.push_str(&format!("- Export Report (JSON): {}\n", config.export_report));
    prompt.push_str(&format!("- Online GeoIP Lookup: {}\n", config.online_geo_ip));
    prompt.push_str(&format!("- Vulnerability Scan: {}\n", config.vuln_scan));
}

fn push_platform_section(prompt: &mut String, config: &ScriptConfig) {
    prompt.push_str("1. **Cross-Platform Core & OS Specifics**:\n");
    prompt.push_str("   - The script MUST work on Windows, Linux, and macOS without modification.\n");
    if config.os_target != crate::OsTarget::CrossPlatform {
        prompt.push_str(&format!(
            "   - The primary target is {}; test that path first but keep the other platforms working.\n",
            config.os_target.label()
        ));
    }
    prompt.push_str("   - **Windows Compatibility**:\n");
    prompt.push_str("      - Explicitly check `if platform.system() == 'Windows':` and set `asyncio.set_event_loop_policy(asyncio.WindowsSelectorEventLoopPolicy())` before `asyncio.run()`. This is crucial for subprocess/threading compatibility.\n");
    prompt.push_str("   - **Interface Detection**:\n");
    prompt.push_str("      - Do not hardcode 'eth0' or 'wlan0'.\n");
    prompt.push_str("      - Use `socket` to connect to a dummy public IP (e.g., 8.8.8.8) to find the correct local interface IP and subnet dynamically.\n");
    prompt.push_str("      - If `scapy` is used, ensure `conf.iface` is set to the interface associated with that local IP.\n\n");
}

fn push_concurrency_section(prompt: &mut String) {
    prompt.push_str("2. **Concurrency (Best Performance)**:\n");
    prompt.push_str("   - Use `asyncio` as the main entry point.\n");
    prompt.push_str("   - `bleak` is async-native.\n");
    prompt.push_str("   - `scapy` (ARP scan) is blocking. You MUST run the scapy logic in a `ThreadPoolExecutor` using `loop.run_in_executor` so it does not block the Bluetooth scan.\n");
    prompt.push_str("   - Run both scans concurrently using `asyncio.gather()`.\n\n");
}

fn push_device_data_section(prompt: &mut String) {
    prompt.push_str("3. **Device Data (OFFLINE ONLY)**:\n");
    prompt.push_str("   - For LAN: Extract IP, MAC.\n");
    prompt.push_str("   - **Vendor Resolution**: Use LOCAL databases only (e.g., Scapy's built-in OUI database or Nmap's internal DB). **DO NOT** make HTTP requests to external APIs for MAC vendors.\n");
    prompt.push_str("   - **Hostname**: Use standard `socket.gethostbyaddr` (local DNS/mDNS).\n");
    prompt.push_str("   - For Bluetooth: Extract Name, Address (UUID/MAC), and RSSI.\n\n");
}

fn push_deep_scan_section(prompt: &mut String, config: &ScriptConfig) {
    prompt.push_str("4. **Deep Scan Logic (INTEGRATE BEST OFFLINE TOOLS)**:\n");
    if !config.deep_scan {
        prompt.push_str("   - Deep Scan Mode is DISABLED. Do not sniff packets or call Nmap for OS detection.\n\n");
        return;
    }
    prompt.push_str("   - **EXECUTE ONLY IF Deep Scan Mode is TRUE**:\n");
    prompt.push_str("   - **Packet Sniffing (Wireshark-style)**:\n");
    prompt.push_str("     - Perform a brief, non-blocking packet capture on the active interface: `scapy.sniff(count=50, timeout=5)`.\n");
    prompt.push_str("     - **Traffic Analysis**: Iterate through captured packets to count protocols (TCP, UDP, ICMP, ARP, DNS, MDNS).\n");
    prompt.push_str("     - **Fingerprinting**: Print a \"Network Traffic Analysis\" summary table. Show the percentage distribution of protocols to identify network characteristics (e.g., High UDP = Streaming/VoIP, High MDNS = IoT/Smart Home).\n");
    prompt.push_str("   - **Nmap Integration**: Check if `nmap` is installed (using `shutil.which('nmap')`).\n");
    prompt.push_str("     - If YES: Use `nmap` (via subprocess or `python-nmap`) to perform OS detection (`-O`) and Service Versioning (`-sV`) on discovered hosts.\n");
    prompt.push_str("     - If NO: Fallback to standard ARP/mDNS logic and print a tip: \"Install Nmap for better results\".\n");
    prompt.push_str("   - **Identity & Prediction**: If device name is unknown, predict device type using MAC OUI and mDNS/Bonjour (UDP 5353) traffic patterns locally.\n\n");
}

fn push_port_section(prompt: &mut String, config: &ScriptConfig) {
    prompt.push_str("5. **Port Scanning (If Enabled)**:\n");
    if !config.scan_ports {
        prompt.push_str("   - 'Scan Ports' is false. Do not open TCP connections to discovered hosts.\n\n");
        return;
    }
    prompt.push_str("   - If 'Scan Ports' is true:\n");
    prompt.push_str("   - **Prefer Nmap**: If `nmap` is available, use it for the port scan (faster and more accurate).\n");
    prompt.push_str("   - **Fallback**: If `nmap` is missing, perform a TCP Connect scan using `asyncio.open_connection` with a semaphore to limit concurrency (max 50 tasks).\n");
    prompt.push_str(&format!("   - Parse '{}' (list or range).\n\n", config.port_range));
}

fn push_report_section(prompt: &mut String, config: &ScriptConfig) {
    prompt.push_str("6. **Report Export (If Enabled)**:\n");
    if !config.export_report {
        prompt.push_str("   - Report export is disabled. Print results to the console only.\n\n");
        return;
    }
    prompt.push_str("   - At the end of the script, collect all discovered device data into a Python list of dictionaries.\n");
    prompt.push_str("   - Write this data to a file named `network_scan_report.json` in the current directory.\n");
    prompt.push_str("   - Print: \"[+] Report saved to network_scan_report.json\"\n\n");
}

fn push_online_section(prompt: &mut String, config: &ScriptConfig) {
    prompt.push_str("7. **Online & Vulnerability Features (OPTIONAL)**:\n");
    if config.online_geo_ip {
        prompt.push_str("   - **GeoIP (Online)**: Enabled.\n");
        prompt.push_str("     - Allow usage of `requests` to query public APIs (e.g., `https://api.ipify.org?format=json` for IP and `https://ipapi.co/json/` for location).\n");
        prompt.push_str("     - Wrap in try/except to handle no internet.\n");
    } else {
        prompt.push_str("   - **GeoIP (Online)**: Disabled. The script must not contact any internet API.\n");
    }
    if config.vuln_scan {
        prompt.push_str("   - **Vulnerability Scan (Nmap)**: Enabled, only when Nmap is installed.\n");
        prompt.push_str("     - Add `--script vuln` to the Nmap arguments.\n");
        prompt.push_str("     - Note: This is slow, print a message \"Running Vulnerability Scan...\".\n");
    } else {
        prompt.push_str("   - **Vulnerability Scan (Nmap)**: Disabled.\n");
    }
    prompt.push('\n');
}

fn push_error_handling_section(prompt: &mut String) {
    prompt.push_str("8. **Robust Error Handling (CRITICAL)**:\n");
    prompt.push_str("   - **Library Imports**: Wrap ALL third-party imports (`scapy`, `bleak`, `python-nmap`, `requests`) in `try-except ImportError`. If missing, print: \"[!] Error: Library 'name' missing. Run: pip install name\" and exit.\n");
    prompt.push_str("   - **Permission Checks**: Catch `PermissionError` or `scapy.error.Scapy_Exception`. Print: \"[!] Permission Denied. Run with sudo/Admin rights.\"\n");
    prompt.push_str("   - **Partial Failure**: If Bluetooth fails (e.g., no adapter), catch the exception, print a warning, but **CONTINUE** the WiFi scan. Do not crash the whole script.\n");
    prompt.push_str("   - **Network Down**: If no network connection is found, print a clear error instead of a stack trace.\n\n");
}

fn push_header_section(prompt: &mut String) {
    prompt.push_str("9. **Script Header & Attribution**:\n");
    prompt.push_str("   - Add a standard Python docstring at the very top of the script.\n");
    prompt.push_str("   - Include fields for: 'Author', 'GitHub Profile', and 'Social Links'.\n");
    prompt.push_str("   - Leave these fields as placeholders (e.g., \"[Insert Name Here]\") for the user to fill out manually.\n\n");
}

fn push_output_format(prompt: &mut String) {
    prompt.push_str("**Output Format**:\n");
    prompt.push_str("- Print a clean, aligned table using standard string formatting (f-strings with padding).\n");
    prompt.push_str("- Example columns: | TYPE | IP / ADDRESS | MAC | NAME / VENDOR | PORTS/OS |\n");
    prompt.push_str("- Use `colorama` for basic coloring (Green for online, Red for errors) if available.\n\n");
    prompt.push_str("RETURN ONLY THE RAW PYTHON CODE. NO MARKDOWN. NO BACKTICKS.\n");
}

/// Build the explanation prompt from a bounded prefix of the script.
///
/// The prefix is cut on a character boundary.
pub fn build_explain_prompt(code: &str, prefix_chars: usize) -> String {
    let snippet: String = code.chars().take(prefix_chars).collect();

    format!(
        "Analyze the following Python network scanner script.\n\
         Explain how it achieves cross-platform compatibility and concurrency.\n\
         Highlight how it integrates external tools like Nmap or Wireshark-style sniffing if present.\n\
         Specifically mention if any Online features (GeoIP) or Vulnerability scans are enabled.\n\
         List the libraries required.\n\n\
         Script snippet:\n{}...\n",
        snippet
    )
}

/// Compute a stable SHA-256 fingerprint for a prompt string.
pub fn hash_prompt(prompt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(prompt.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        hex.push_str(&format!("{:02x}", byte));
    }
    hex
}
