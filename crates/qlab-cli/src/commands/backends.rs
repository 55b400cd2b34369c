//! `qlab backends`: the local simulator plus whatever IBM devices the
//! configured credentials can see.

use anyhow::Result;
use console::{StyledObject, style};

use qlab_adapter_ibm::{BackendInfo, IbmClient, IbmConfig, IbmResult, least_busy};
use qlab_adapter_sim::SimulatorBackend;
use qlab_hal::Backend;

pub async fn execute() -> Result<()> {
    println!("{}\n", style("Backends").cyan().bold());
    print_simulator().await?;

    let config = match IbmConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            println!("  {} {}", style("○").dim(), style("ibm (not configured)").dim());
            println!("    {err}");
            return Ok(());
        }
    };

    match fetch_devices(&config).await {
        Ok(devices) => print_devices(&devices),
        Err(err) => {
            println!("  {} {}", style("○").yellow(), style("ibm (unreachable)").bold());
            println!("    {err}");
        }
    }
    Ok(())
}

async fn print_simulator() -> Result<()> {
    let sim = SimulatorBackend::new();
    let up = sim.availability().await?.is_available;
    let caps = sim.capabilities();

    println!("  {} {} (local)", dot(up), style(sim.name()).bold());
    println!("    qubits     {}", caps.num_qubits);
    println!("    max shots  {}", caps.max_shots);
    println!("    gates      {}", caps.gate_set.native_names().join(" "));
    println!();
    Ok(())
}

async fn fetch_devices(config: &IbmConfig) -> IbmResult<Vec<BackendInfo>> {
    IbmClient::connect(config).await?.list_backends().await
}

fn print_devices(devices: &[BackendInfo]) {
    let pick = least_busy(devices.to_vec()).map(|d| d.name);
    for device in devices {
        let tag = match (pick.as_deref() == Some(device.name.as_str()), device.simulator) {
            (true, _) => style(" <- least busy").cyan().to_string(),
            (false, true) => " (simulator)".to_owned(),
            (false, false) => String::new(),
        };
        println!("  {} {}{tag}", dot(device.status.operational), style(&device.name).bold());
        println!("    qubits     {}", device.num_qubits);
        println!("    queue      {}", device.status.pending_jobs);
        if let Some(msg) = &device.status.status_msg {
            println!("    status     {msg}");
        }
        println!("    gates      {}", device.basis_gates.join(" "));
        println!();
    }
}

fn dot(up: bool) -> StyledObject<&'static str> {
    if up { style("●").green() } else { style("○").yellow() }
}
