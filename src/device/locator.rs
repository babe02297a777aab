use serialport::SerialPortType;
use std::thread;
use std::time::Duration;

/// Board vendors whose USB descriptors identify the touch controller.
pub const VENDOR_FRAGMENTS: [&str; 3] = ["Arduino", "Genuino", "Lilypad"];
pub const RETRY_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortDescriptor {
    pub path: String,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
    pub vid: Option<u16>,
    pub pid: Option<u16>,
    pub serial_number: Option<String>,
}

impl PortDescriptor {
    /// Manufacturer and product joined with a space, empty fields left out.
    pub fn description(&self) -> String {
        [&self.manufacturer, &self.product]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub trait PortEnumerator {
    fn ports(&mut self) -> Vec<PortDescriptor>;
}

/// The serial ports the OS knows about right now.
pub struct SystemPorts;

impl PortEnumerator for SystemPorts {
    fn ports(&mut self) -> Vec<PortDescriptor> {
        let ports = match serialport::available_ports() {
            Ok(ports) => ports,
            Err(e) => {
                tracing::debug!(error = %e, "cannot enumerate serial ports");
                return vec![];
            }
        };
        ports
            .into_iter()
            .map(|p| match p.port_type {
                SerialPortType::UsbPort(usb) => PortDescriptor {
                    path: p.port_name,
                    manufacturer: usb.manufacturer,
                    product: usb.product,
                    vid: Some(usb.vid),
                    pid: Some(usb.pid),
                    serial_number: usb.serial_number,
                },
                _ => PortDescriptor {
                    path: p.port_name,
                    ..Default::default()
                },
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct PortFilter {
    fragments: Vec<String>,
    any: bool,
}

impl PortFilter {
    pub fn new(fragments: &[&str]) -> Self {
        Self {
            fragments: fragments.iter().map(|f| f.to_lowercase()).collect(),
            any: false,
        }
    }

    /// Accepts whatever port comes first, for testing without the board.
    pub fn any() -> Self {
        Self {
            fragments: vec![],
            any: true,
        }
    }

    pub fn matches(&self, port: &PortDescriptor) -> bool {
        if self.any {
            return true;
        }
        let description = port.description().to_lowercase();
        self.fragments.iter().any(|f| description.contains(f.as_str()))
    }
}

impl Default for PortFilter {
    fn default() -> Self {
        Self::new(&VENDOR_FRAGMENTS)
    }
}

/// Path of the first port the filter accepts, if any is plugged in.
pub fn locate(ports: &mut impl PortEnumerator, filter: &PortFilter) -> Option<String> {
    for port in ports.ports() {
        tracing::debug!(
            path = %port.path,
            vid = ?port.vid,
            pid = ?port.pid,
            serial = ?port.serial_number,
            manufacturer = ?port.manufacturer,
            product = ?port.product,
            "serial port"
        );
        if filter.matches(&port) {
            tracing::info!(path = %port.path, description = %port.description(), "found controller");
            return Some(port.path);
        }
    }
    None
}

/// Polls until the controller shows up. There is no upper bound: the installation
/// just sits there until someone plugs the board in.
#[tracing::instrument(skip(ports))]
pub fn wait_for_device(
    ports: &mut impl PortEnumerator,
    filter: &PortFilter,
    interval: Duration,
) -> String {
    let mut announced = false;
    loop {
        if let Some(path) = locate(ports, filter) {
            return path;
        }
        if !announced {
            tracing::info!("waiting for the controller to be plugged in...");
            announced = true;
        }
        thread::sleep(interval);
    }
}
