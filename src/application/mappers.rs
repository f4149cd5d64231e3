// Mappers: Convert between gRPC protobuf types and domain models
// This keeps protobuf dependencies isolated from business logic (Dependency Inversion)

use crate::application::blend_service::BlendRequest;
use crate::domain::models::{
    BlendResult, BlendSpecification, Grain, GrainUsage, Identifier, OptimizationResult,
};

pub mod grain_blend {
    tonic::include_proto!("grain_blend");
}

use grain_blend as proto;

/// Convert protobuf Grain to domain Grain
pub fn proto_to_domain_grain(proto_grain: proto::Grain) -> Grain {
    Grain {
        id: Identifier::Text(proto_grain.id),
        lote: if proto_grain.lote.is_empty() {
            None
        } else {
            Some(Identifier::Text(proto_grain.lote))
        },
        // A missing qtd is rejected during request validation as NaN
        qtd: proto_grain.qtd.unwrap_or(f64::NAN),
        characteristics: proto_grain.characteristics.into_iter().collect(),
    }
}

/// Convert protobuf BlendRequest to the service request
///
/// Absent messages stay `None` so validation reports them as missing.
pub fn proto_to_domain_request(proto_req: proto::BlendRequest) -> BlendRequest {
    BlendRequest {
        blend_detail: proto_req
            .blend_detail
            .map(|detail| detail.bounds.into_iter().collect::<BlendSpecification>()),
        grains: proto_req.grains.map(|catalog| {
            catalog
                .grains
                .into_iter()
                .map(proto_to_domain_grain)
                .collect()
        }),
        quantity: proto_req.quantity,
    }
}

fn domain_to_proto_usage(usage: GrainUsage) -> proto::GrainUsage {
    proto::GrainUsage {
        id: usage.id.to_string(),
        lote: usage.lote.map(|l| l.to_string()).unwrap_or_default(),
        quantity: usage.quantity,
    }
}

/// Convert domain BlendResult to protobuf BlendResponse
pub fn domain_to_proto_response(result: BlendResult) -> proto::BlendResponse {
    let OptimizationResult {
        feasible,
        result: objective,
        bounded,
        is_integral,
        grains_used,
    } = result.optimization_result;

    proto::BlendResponse {
        status: "success".to_string(),
        result: Some(proto::BlendResult {
            optimization_result: Some(proto::OptimizationResult {
                feasible,
                result: objective,
                bounded,
                is_integral,
                grains_used: grains_used.into_iter().map(domain_to_proto_usage).collect(),
            }),
            characteristics_avg: result.characteristics_avg.into_iter().collect(),
            total_quantity_used: result.total_quantity_used,
        }),
    }
}
