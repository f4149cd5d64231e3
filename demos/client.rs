// Example client for the grain blending gRPC service
//
// Blends 1000 units from three lots so that the mix holds at least 12%
// protein and at most 13% moisture, first maximizing slack and then
// favoring the newest harvest.
//
// Start the server first:
//   cargo run --features server --bin grain-blend-server

use std::collections::HashMap;

use tonic::Request;

pub mod grain_blend {
    tonic::include_proto!("grain_blend");
}

use grain_blend::{
    grain_blender_client::GrainBlenderClient, BlendDetail, BlendRequest, Empty, Grain,
    GrainCatalog,
};

fn grain(id: &str, lote: &str, qtd: f64, proteina: f64, umidade: f64, safra: f64) -> Grain {
    Grain {
        id: id.to_string(),
        lote: lote.to_string(),
        qtd: Some(qtd),
        characteristics: HashMap::from([
            ("proteina".to_string(), proteina),
            ("umidade".to_string(), umidade),
            ("safra".to_string(), safra),
        ]),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut client = GrainBlenderClient::connect("http://127.0.0.1:3000").await?;

    let solvers = client.get_available_solvers(Request::new(Empty {})).await?;
    for solver in solvers.into_inner().solvers {
        println!("Solver available: {} (MIP: {})", solver.name, solver.supports_mip);
    }

    let request = BlendRequest {
        blend_detail: Some(BlendDetail {
            bounds: HashMap::from([
                ("min_proteina".to_string(), 0.12),
                ("max_umidade".to_string(), 0.13),
            ]),
        }),
        grains: Some(GrainCatalog {
            grains: vec![
                grain("1", "2022-03", 600.0, 0.10, 0.12, 2022.0),
                grain("2", "2023-05", 500.0, 0.13, 0.14, 2023.0),
                grain("3", "2024-02", 400.0, 0.14, 0.12, 2024.0),
            ],
        }),
        quantity: Some(1000.0),
    };

    println!("\n=== Solve (slack) ===");
    let response = client.solve(Request::new(request.clone())).await?;
    print_response(response.into_inner());

    println!("\n=== MaximizeAge (newest harvest) ===");
    let response = client.maximize_age(Request::new(request)).await?;
    print_response(response.into_inner());

    Ok(())
}

fn print_response(response: grain_blend::BlendResponse) {
    let Some(result) = response.result else {
        println!("No result returned (status: {})", response.status);
        return;
    };
    let Some(optimization) = result.optimization_result else {
        println!("No optimization result returned");
        return;
    };

    if !optimization.feasible {
        println!("No blend satisfies every bound");
        return;
    }

    println!("Objective: {:.2}", optimization.result);
    for usage in &optimization.grains_used {
        println!("  grain {} (lote {}): {} units", usage.id, usage.lote, usage.quantity);
    }
    println!("Total used: {}", result.total_quantity_used);

    let mut averages: Vec<_> = result.characteristics_avg.into_iter().collect();
    averages.sort_by(|a, b| a.0.cmp(&b.0));
    for (name, avg) in averages {
        println!("  avg {}: {:.2}", name, avg);
    }
}
