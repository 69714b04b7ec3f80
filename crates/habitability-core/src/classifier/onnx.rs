//! ONNX classifier inference using tract
//!
//! Expects a classifier graph with one `[1, 11]` float input and two
//! outputs: the predicted label (int64) and the `[1, 2]` probability
//! matrix, as produced by exporters with the ZipMap post-processor
//! disabled.

use super::{check_arity, Classifier, ClassifierBackend};
use crate::encoder::FEATURE_COUNT;
use crate::error::{PredictorError, Result};
use std::time::Instant;
use tract_onnx::prelude::*;
use tracing::debug;

const LABEL_OUTPUT: usize = 0;
const PROBABILITY_OUTPUT: usize = 1;

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// ONNX-based classifier evaluated with tract
pub struct OnnxClassifier {
    model: TractModel,
}

impl OnnxClassifier {
    /// Parse, optimize and validate an ONNX model from bytes
    pub fn from_bytes(model_bytes: &[u8]) -> std::result::Result<Self, String> {
        let model = tract_onnx::onnx()
            .model_for_read(&mut std::io::Cursor::new(model_bytes))
            .map_err(|e| format!("Failed to parse ONNX model: {:#}", e))?;
        Self::from_model(model)
    }

    fn from_model(model: InferenceModel) -> std::result::Result<Self, String> {
        let model = model
            .with_input_fact(0, f32::fact([1, FEATURE_COUNT]).into())
            .map_err(|e| format!("Failed to set input shape: {:#}", e))?
            .into_optimized()
            .map_err(|e| format!("Failed to optimize model: {:#}", e))?;

        let outputs = model
            .output_outlets()
            .map_err(|e| format!("Failed to inspect model outputs: {:#}", e))?
            .len();
        if outputs <= PROBABILITY_OUTPUT {
            return Err(format!(
                "model has {} outputs, expected label and probability outputs",
                outputs
            ));
        }

        let model = model
            .into_runnable()
            .map_err(|e| format!("Failed to create runnable model: {:#}", e))?;
        Ok(Self { model })
    }

    fn features_to_tensor(features: &[f64]) -> Result<Tensor> {
        let data: Vec<f32> = features.iter().map(|v| *v as f32).collect();
        let array = tract_ndarray::Array2::from_shape_vec((1, FEATURE_COUNT), data)
            .map_err(|e| PredictorError::inference(format!("invalid input shape: {}", e)))?;
        Ok(array.into())
    }

    fn run(&self, features: &[f64]) -> Result<TVec<TValue>> {
        check_arity(features)?;
        let start = Instant::now();
        let input = Self::features_to_tensor(features)?;
        let outputs = self
            .model
            .run(tvec!(input.into()))
            .map_err(|e| PredictorError::inference(format!("model execution failed: {:#}", e)))?;
        debug!(elapsed_us = start.elapsed().as_micros(), "ONNX inference completed");
        Ok(outputs)
    }
}

impl Classifier for OnnxClassifier {
    fn predict_class(&self, features: &[f64]) -> Result<u8> {
        let outputs = self.run(features)?;
        let label = outputs
            .get(LABEL_OUTPUT)
            .ok_or_else(|| PredictorError::inference("model produced no label output"))?;
        let view = label
            .to_array_view::<i64>()
            .map_err(|e| PredictorError::inference(format!("unexpected label output: {:#}", e)))?;
        match view.iter().next().copied() {
            Some(0) => Ok(0),
            Some(1) => Ok(1),
            Some(other) => Err(PredictorError::inference(format!(
                "model predicted unknown class {}",
                other
            ))),
            None => Err(PredictorError::inference("label output is empty")),
        }
    }

    fn predict_probabilities(&self, features: &[f64]) -> Result<[f64; 2]> {
        let outputs = self.run(features)?;
        let probabilities = outputs
            .get(PROBABILITY_OUTPUT)
            .ok_or_else(|| PredictorError::inference("model produced no probability output"))?;
        let view = probabilities.to_array_view::<f32>().map_err(|e| {
            PredictorError::inference(format!("unexpected probability output: {:#}", e))
        })?;
        let values: Vec<f32> = view.iter().copied().collect();
        if values.len() != 2 {
            return Err(PredictorError::inference(format!(
                "probability output has {} values, expected 2",
                values.len()
            )));
        }
        Ok([values[0] as f64, values[1] as f64])
    }

    fn backend(&self) -> ClassifierBackend {
        ClassifierBackend::Onnx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tract_onnx::pb::{
        attribute_proto::AttributeType, tensor_proto::DataType, tensor_shape_proto::dimension,
        tensor_shape_proto::Dimension, type_proto, AttributeProto, GraphProto, ModelProto,
        NodeProto, OperatorSetIdProto, TensorProto, TensorShapeProto, TypeProto, ValueInfoProto,
    };

    const TERRAN_COLUMN: usize = 10;

    fn value_info(name: &str, elem_type: DataType, dims: &[i64]) -> ValueInfoProto {
        ValueInfoProto {
            name: name.to_string(),
            r#type: Some(TypeProto {
                value: Some(type_proto::Value::TensorType(type_proto::Tensor {
                    elem_type: elem_type as i32,
                    shape: Some(TensorShapeProto {
                        dim: dims
                            .iter()
                            .map(|d| Dimension {
                                value: Some(dimension::Value::DimValue(*d)),
                                ..Default::default()
                            })
                            .collect(),
                    }),
                })),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn node(op_type: &str, input: &[&str], output: &[&str], attribute: Vec<AttributeProto>) -> NodeProto {
        NodeProto {
            op_type: op_type.to_string(),
            input: input.iter().map(|s| s.to_string()).collect(),
            output: output.iter().map(|s| s.to_string()).collect(),
            attribute,
            ..Default::default()
        }
    }

    fn int_attr(name: &str, value: i64) -> AttributeProto {
        AttributeProto {
            name: name.to_string(),
            r#type: AttributeType::Int as i32,
            i: value,
            ..Default::default()
        }
    }

    fn float_initializer(name: &str, dims: &[i64], values: Vec<f32>) -> TensorProto {
        TensorProto {
            name: name.to_string(),
            dims: dims.to_vec(),
            data_type: DataType::Float as i32,
            float_data: values,
            ..Default::default()
        }
    }

    /// Linear two-class graph shaped like an exported classifier:
    /// `label` (ArgMax) first, `probabilities` (Softmax) second.
    /// Only the Terran indicator moves the positive logit.
    fn terran_classifier_proto(with_label_output: bool) -> ModelProto {
        let mut weights = vec![0.0f32; FEATURE_COUNT * 2];
        weights[TERRAN_COLUMN * 2 + 1] = 4.0;

        let mut nodes = vec![
            node("MatMul", &["input", "weights"], &["scores"], vec![]),
            node("Add", &["scores", "bias"], &["logits"], vec![]),
            node("Softmax", &["logits"], &["probabilities"], vec![int_attr("axis", 1)]),
        ];
        let mut outputs = vec![value_info("probabilities", DataType::Float, &[1, 2])];
        if with_label_output {
            nodes.push(node(
                "ArgMax",
                &["logits"],
                &["label"],
                vec![int_attr("axis", 1), int_attr("keepdims", 0)],
            ));
            outputs.insert(0, value_info("label", DataType::Int64, &[1]));
        }

        ModelProto {
            ir_version: 8,
            opset_import: vec![OperatorSetIdProto {
                domain: String::new(),
                version: 13,
            }],
            graph: Some(GraphProto {
                name: "habitability".to_string(),
                node: nodes,
                initializer: vec![
                    float_initializer("weights", &[FEATURE_COUNT as i64, 2], weights),
                    float_initializer("bias", &[2], vec![0.0, -2.0]),
                ],
                input: vec![value_info("input", DataType::Float, &[1, FEATURE_COUNT as i64])],
                output: outputs,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn build(with_label_output: bool) -> std::result::Result<OnnxClassifier, String> {
        let model = tract_onnx::onnx()
            .model_for_proto_model(&terran_classifier_proto(with_label_output))
            .map_err(|e| format!("{:#}", e))?;
        OnnxClassifier::from_model(model)
    }

    fn one_hot(column: usize) -> [f64; FEATURE_COUNT] {
        let mut features = [0.0; FEATURE_COUNT];
        features[..5].copy_from_slice(&[3.9, 268.1, 0.85, 1.72, 5.61]);
        features[column] = 1.0;
        features
    }

    #[test]
    fn test_reads_label_and_probability_outputs() {
        let classifier = build(true).unwrap();
        let positive = 1.0 / (1.0 + (-2.0f64).exp());

        let terran = one_hot(TERRAN_COLUMN);
        assert_eq!(classifier.predict_class(&terran).unwrap(), 1);
        let probabilities = classifier.predict_probabilities(&terran).unwrap();
        assert!((probabilities[1] - positive).abs() < 1e-5);
        assert!((probabilities[0] + probabilities[1] - 1.0).abs() < 1e-5);

        let jovian = one_hot(5);
        assert_eq!(classifier.predict_class(&jovian).unwrap(), 0);
        let probabilities = classifier.predict_probabilities(&jovian).unwrap();
        assert!((probabilities[1] - (1.0 - positive)).abs() < 1e-5);
        assert_eq!(classifier.backend(), ClassifierBackend::Onnx);
    }

    #[test]
    fn test_rejects_graph_without_label_output() {
        let err = build(false).err().unwrap();
        assert!(err.contains("expected label and probability outputs"), "error was {}", err);
    }

    #[test]
    fn test_rejects_wrong_arity() {
        let classifier = build(true).unwrap();
        let err = classifier.predict_class(&[1.0; 4]).unwrap_err();
        assert_eq!(err.kind(), "inference_error");
    }

    #[test]
    fn test_rejects_garbage_bytes() {
        let err = OnnxClassifier::from_bytes(b"\x00\x01\x02garbage").err().unwrap();
        assert!(err.starts_with("Failed to parse ONNX model"), "error was {}", err);
    }

    #[test]
    fn test_tensor_shape() {
        let tensor = OnnxClassifier::features_to_tensor(&[0.5; FEATURE_COUNT]).unwrap();
        assert_eq!(tensor.shape(), &[1, FEATURE_COUNT]);
        assert!(OnnxClassifier::features_to_tensor(&[0.5; 3]).is_err());
    }
}
