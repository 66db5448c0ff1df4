use std::process::Command;
use tempfile::TempDir;

fn ordem_cmd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ordem"));
    cmd.env("ORDEM_ACTOR", "tester");
    cmd
}

#[test]
fn test_init_creates_ordem_directory() {
    let tmp = TempDir::new().unwrap();

    let output = ordem_cmd()
        .current_dir(tmp.path())
        .args(["init"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(tmp.path().join(".ordem").exists());
    assert!(tmp.path().join(".ordem/orders.db").exists());
}

#[test]
fn test_init_twice_fails() {
    let tmp = TempDir::new().unwrap();

    ordem_cmd()
        .current_dir(tmp.path())
        .args(["init"])
        .output()
        .unwrap();

    let output = ordem_cmd()
        .current_dir(tmp.path())
        .args(["init"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Already initialized"));
}

#[test]
fn test_add_without_init_fails() {
    let tmp = TempDir::new().unwrap();

    let output = ordem_cmd()
        .current_dir(tmp.path())
        .args([
            "add",
            "PROT-001",
            "--so-number=OS-001",
            "--recipient=Cliente",
            "--description=Teste",
        ])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Not in an ordem project"));
}

#[test]
fn test_full_order_workflow() {
    let tmp = TempDir::new().unwrap();

    let output = ordem_cmd()
        .current_dir(tmp.path())
        .args(["init"])
        .output()
        .unwrap();
    assert!(output.status.success());

    // Create an order
    let output = ordem_cmd()
        .current_dir(tmp.path())
        .args([
            "add",
            "PROT-001",
            "--so-number=OS-001",
            "--recipient=Cliente Um",
            "--description=Instalar Office",
            "--priority=high",
            "--cpf=401.853.320-99",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("PROT-001"));
    assert!(stdout.contains("Cliente Um"));

    // List shows it with its SLA deadline
    let output = ordem_cmd()
        .current_dir(tmp.path())
        .args(["list"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("PROT-001"));
    assert!(stdout.contains("[open]"));

    // JSON output carries the computed fields
    let output = ordem_cmd()
        .current_dir(tmp.path())
        .args(["list", "--json"])
        .output()
        .unwrap();
    let orders: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("list --json output");
    assert_eq!(orders.as_array().unwrap().len(), 1);
    let order = &orders[0];
    assert_eq!(order["protocol"], "PROT-001");
    assert_eq!(order["priority"], "high");
    assert_eq!(order["created_by"], "tester");
    assert_eq!(order["cpf"], "40185332099");
    assert!(order["sla_deadline"].is_string());
    let id = order["id"].as_str().unwrap().to_string();

    // Get by UUID prefix
    let output = ordem_cmd()
        .current_dir(tmp.path())
        .args(["get", &id[..7]])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("PROT-001"));
    assert!(stdout.contains("Cliente Um"));

    // Update priority; the audit trail gains an UPDATED entry
    let output = ordem_cmd()
        .current_dir(tmp.path())
        .args(["update", &id, "--priority=critical", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let updated: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(updated["priority"], "critical");
    assert_eq!(updated["updated_by"], "tester");

    let output = ordem_cmd()
        .current_dir(tmp.path())
        .args(["logs", &id, "--json"])
        .output()
        .unwrap();
    let logs: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let logs = logs.as_array().unwrap();
    assert_eq!(logs.len(), 2);
    // Newest first
    assert_eq!(logs[0]["change_type"], "UPDATED");
    assert_eq!(logs[0]["old_values"]["priority"], "high");
    assert_eq!(logs[0]["new_values"]["priority"], "critical");
    assert_eq!(logs[1]["change_type"], "CREATED");
    assert!(logs[1]["old_values"].is_null());

    // Soft delete hides the order but keeps the trail
    let output = ordem_cmd()
        .current_dir(tmp.path())
        .args(["delete", &id])
        .output()
        .unwrap();
    assert!(output.status.success());

    let output = ordem_cmd()
        .current_dir(tmp.path())
        .args(["list"])
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No orders found"));

    let output = ordem_cmd()
        .current_dir(tmp.path())
        .args(["logs", &id, "--json"])
        .output()
        .unwrap();
    let logs: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(logs.as_array().unwrap().len(), 3);
    assert_eq!(logs[0]["change_type"], "DELETED");
}

#[test]
fn test_add_rejects_invalid_cpf() {
    let tmp = TempDir::new().unwrap();

    ordem_cmd()
        .current_dir(tmp.path())
        .args(["init"])
        .output()
        .unwrap();

    let output = ordem_cmd()
        .current_dir(tmp.path())
        .args([
            "add",
            "PROT-001",
            "--so-number=OS-001",
            "--recipient=Cliente",
            "--description=Teste",
            "--cpf=111.111.111-11",
        ])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cpf"));
}

#[test]
fn test_duplicate_protocol_rejected() {
    let tmp = TempDir::new().unwrap();

    ordem_cmd()
        .current_dir(tmp.path())
        .args(["init"])
        .output()
        .unwrap();

    let add = |proto: &str| {
        ordem_cmd()
            .current_dir(tmp.path())
            .args([
                "add",
                proto,
                "--so-number=OS-001",
                "--recipient=Cliente",
                "--description=Teste",
            ])
            .output()
            .unwrap()
    };

    assert!(add("PROT-001").status.success());
    let output = add("PROT-001");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Protocol already in use"));
}

#[test]
fn test_overview_counts() {
    let tmp = TempDir::new().unwrap();

    ordem_cmd()
        .current_dir(tmp.path())
        .args(["init"])
        .output()
        .unwrap();

    for (proto, priority) in [("PROT-001", "high"), ("PROT-002", "low")] {
        let output = ordem_cmd()
            .current_dir(tmp.path())
            .args([
                "add",
                proto,
                "--so-number=OS-001",
                "--recipient=Cliente",
                "--description=Teste",
                &format!("--priority={}", priority),
            ])
            .output()
            .unwrap();
        assert!(output.status.success());
    }

    let output = ordem_cmd()
        .current_dir(tmp.path())
        .args(["overview", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["total_orders"], 2);
    assert_eq!(report["by_status"][0]["status"], "open");
    assert_eq!(report["by_status"][0]["total"], 2);
    // The high-priority order is due within 24h of creation
    assert_eq!(report["sla"]["due_in_24h"], 1);
    assert_eq!(report["sla"]["late"], 0);
}

#[test]
fn test_csv_import_best_effort() {
    let tmp = TempDir::new().unwrap();

    ordem_cmd()
        .current_dir(tmp.path())
        .args(["init"])
        .output()
        .unwrap();

    let csv = "protocol,so_number,type,status,provider,priority,recipient_name,cpf,description\n\
               PROT-001,OS-001,installation,open,technical,high,Cliente Um,401.853.320-99,Instalar\n\
               PROT-002,OS-002,,,,,Cliente Dois,111.111.111-11,CPF ruim\n";
    let csv_path = tmp.path().join("orders.csv");
    std::fs::write(&csv_path, csv).unwrap();

    let output = ordem_cmd()
        .current_dir(tmp.path())
        .args(["import", "orders.csv", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["created"], 1);
    assert_eq!(report["errors"].as_array().unwrap().len(), 1);
    assert_eq!(report["errors"][0]["line"], 3);

    let output = ordem_cmd()
        .current_dir(tmp.path())
        .args(["list", "--json"])
        .output()
        .unwrap();
    let orders: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(orders.as_array().unwrap().len(), 1);
    assert_eq!(orders[0]["protocol"], "PROT-001");
}
