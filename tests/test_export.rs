use fog_taskgraph::domain::allocation::allocate_task;
use fog_taskgraph::domain::generator::network_config::NetworkGeneratorConfig;
use fog_taskgraph::domain::generator::network_generator::NetworkGenerator;
use fog_taskgraph::domain::generator::presets::TaskPreset;
use fog_taskgraph::domain::generator::task_generator::TaskGenerator;
use fog_taskgraph::domain::network::network::Network;
use fog_taskgraph::domain::network::node::{Node, NodeType};
use fog_taskgraph::domain::schedule::schedule::Schedule;
use fog_taskgraph::domain::schedule::task::Task;
use fog_taskgraph::domain::utils::id::{NodeId, TaskId};
use fog_taskgraph::export::ampl::model_to_ampl;
use fog_taskgraph::export::dat::{DAT_INFINITE_DELAY, model_to_dat, parse_dat};

fn small_instance() -> (Schedule, Network) {
    let mut schedule = Schedule::new();
    let tasks = [
        Task::new("sense", true, 1, 10, 10, 0, 1).with_id(TaskId::new("t0")),
        Task::new("filter", false, 3, 20, 15, 2, 4).with_id(TaskId::new("t1")),
        Task::new("store", false, 5, 40, 40, 0, 8).with_id(TaskId::new("t2")),
    ];
    for task in tasks {
        schedule.add_task(task).unwrap();
    }
    schedule.connect_tasks(&TaskId::new("t0"), &TaskId::new("t1")).unwrap();
    schedule.connect_tasks(&TaskId::new("t1"), &TaskId::new("t2")).unwrap();

    let mut network = Network::new();
    network.add_node(Node::new("MIST 1", NodeType::Mist).with_id(NodeId::new("m")).with_capacity(2, 0.2)).unwrap();
    network.add_node(Node::new("EDGE 1", NodeType::Edge).with_id(NodeId::new("e")).with_capacity(6, 0.8)).unwrap();
    network.add_node(Node::new("Cloud", NodeType::Cloud).with_id(NodeId::new("c")).with_capacity(10, 1.0)).unwrap();
    network.connect_nodes(&NodeId::new("m"), &NodeId::new("e"), 2).unwrap();
    network.connect_nodes(&NodeId::new("e"), &NodeId::new("c"), 5).unwrap();

    allocate_task(&mut network, &schedule, &TaskId::new("t0"), &NodeId::new("m")).unwrap();
    (schedule, network)
}

#[test]
fn test_dat_layout() {
    let (schedule, network) = small_instance();
    let dat = model_to_dat(&schedule, &network).unwrap();
    let lines: Vec<&str> = dat.lines().collect();

    assert_eq!(lines[0], "3");
    assert_eq!(lines[1], "1\t2\t0.2");
    assert_eq!(lines[4], "2");
    assert_eq!(lines[5], "0\t1\t10\t10\t0\t1\t1");
    assert_eq!(lines[6], "1\t3\t20\t15\t2\t4\t0");
    assert_eq!(lines[8], "9");
    // 1 + 3 + 1 + 3 + 1 + 9 + 1 + 9
    assert_eq!(lines.len(), 28);
}

#[test]
fn test_dat_can_be_read_back() {
    let (schedule, network) = small_instance();
    let model = parse_dat(&model_to_dat(&schedule, &network).unwrap()).unwrap();

    assert_eq!(model.nodes.len(), 3);
    assert_eq!(model.nodes[2].memory, 10);
    assert_eq!(model.tasks.len(), 3);
    assert_eq!(model.tasks[0].allocated_node, 1);
    assert_eq!(model.tasks[2].period, 40);
    assert_eq!(model.precedences, vec![(0, 1), (1, 2)]);
    assert_eq!(model.delays[0], vec![0, 2, 7]);
    assert_eq!(model.delays[2], vec![DAT_INFINITE_DELAY, 5, 0]);
}

#[test]
fn test_generated_instance_exports() {
    let schedule = TaskGenerator::from_preset(TaskPreset::Small).unwrap().generate().unwrap();
    let config = NetworkGeneratorConfig { mist_count: 3, edge_count: 2, seed: Some(9), ..Default::default() };
    let network = NetworkGenerator::new(config).unwrap().generate().unwrap();

    let model = parse_dat(&model_to_dat(&schedule, &network).unwrap()).unwrap();
    assert_eq!(model.tasks.len(), schedule.len());
    assert_eq!(model.nodes.len(), 6);
    assert_eq!(model.precedences.len(), schedule.get_precedences().len());

    let ampl = model_to_ampl(&schedule, &network);
    assert!(ampl.contains("set SERVERS := s1 s2 s3 s4 s5 s6;"));
}

#[test]
fn test_ampl_layout() {
    let (schedule, network) = small_instance();
    let ampl = model_to_ampl(&schedule, &network);

    let expected_head = "data;\n\nset TASKS := 1 2 3;\nset SERVERS := s1 s2 s3;\n\n# Precedences\nset PRE := (1,2) (2,3);\n\n";
    assert!(ampl.starts_with(expected_head));
    assert!(ampl.contains("param: T :=\n1 10\n2 20\n3 40\n;\n\n"));
    assert!(ampl.contains("param: Mreq :=\n1 1\n2 4\n3 8\n;\n\n"));
    assert!(ampl.contains("param: MEM :=\ns1 2\ns2 6\ns3 10\n;\n\n"));
    assert!(ampl.contains("param Delta:\n      s1   s2   s3 :=\ns1   0   2   0\ns2   0   0   5\ns3   0   5   0\n;\n\n"));
    assert!(ampl.ends_with("param BigM := 100;\n\nend;\n"));
}
