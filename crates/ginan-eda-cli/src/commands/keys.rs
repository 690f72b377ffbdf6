use ginan_eda_core::ALL;

pub fn run(dataset_path: &str, state: Option<&str>) {
    let ds = super::load_dataset(dataset_path);

    match state {
        None => {
            print_list("Sites", &with_all(ds.sites()));
            print_list("Sats", &with_all(ds.sats()));
            print_list("Measurement keys", &ds.measurement_keys());
            print_list("States", &ds.state_names());
        }
        Some(name) => {
            if !ds.state_names().iter().any(|s| s == name) {
                super::fail(&format!("unknown state '{name}'"));
            }
            println!("State {name}");
            print_list("Sites", &with_all(ds.state_sites(name)));
            print_list("Sats", &with_all(ds.state_sats(name)));
            print_list("Keys", &ds.state_keys(name));
        }
    }
}

/// Options as offered to the analyst: `ALL` first, then every value.
fn with_all(values: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(values.len() + 1);
    out.push(ALL.to_string());
    out.extend(values);
    out
}

fn print_list(title: &str, values: &[String]) {
    println!("  ┌─ {title} ({})", values.len());
    if values.is_empty() {
        println!("  │ (none)");
    } else {
        for chunk in values.chunks(8) {
            println!("  │ {}", chunk.join("  "));
        }
    }
    println!("  └─");
}
