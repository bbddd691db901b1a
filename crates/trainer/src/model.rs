//! ResNet-18 laid out like torchvision's, so its `state_dict` maps onto
//! this module tree with only the downsample keys renamed.

use crate::error::TrainError;
use burn::{
    nn::{
        BatchNorm, BatchNormConfig, Linear, LinearConfig, PaddingConfig2d,
        conv::{Conv2d, Conv2dConfig},
        pool::{AdaptiveAvgPool2d, AdaptiveAvgPool2dConfig, MaxPool2d, MaxPool2dConfig},
    },
    prelude::*,
    record::{FullPrecisionSettings, Recorder},
    tensor::activation::relu,
};
use burn_import::pytorch::{LoadArgs, PyTorchFileRecorder};
use std::path::Path;

/// Width of the classification head input.
pub const FEATURES: usize = 512;
/// Head size of the torchvision ImageNet checkpoint.
pub const IMAGENET_CLASSES: usize = 1000;

const STAGE_CHANNELS: [usize; 4] = [64, 128, 256, 512];
const BLOCKS_PER_STAGE: usize = 2;

fn conv3x3<B: Backend>(
    in_channels: usize,
    out_channels: usize,
    stride: usize,
    device: &B::Device,
) -> Conv2d<B> {
    Conv2dConfig::new([in_channels, out_channels], [3, 3])
        .with_stride([stride, stride])
        .with_padding(PaddingConfig2d::Explicit(1, 1))
        .with_bias(false)
        .init(device)
}

#[derive(Module, Debug)]
pub struct Downsample<B: Backend> {
    conv: Conv2d<B>,
    bn: BatchNorm<B, 2>,
}

impl<B: Backend> Downsample<B> {
    fn new(in_channels: usize, out_channels: usize, stride: usize, device: &B::Device) -> Self {
        Self {
            conv: Conv2dConfig::new([in_channels, out_channels], [1, 1])
                .with_stride([stride, stride])
                .with_bias(false)
                .init(device),
            bn: BatchNormConfig::new(out_channels).init(device),
        }
    }

    fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 4> {
        self.bn.forward(self.conv.forward(input))
    }
}

#[derive(Module, Debug)]
pub struct BasicBlock<B: Backend> {
    conv1: Conv2d<B>,
    bn1: BatchNorm<B, 2>,
    conv2: Conv2d<B>,
    bn2: BatchNorm<B, 2>,
    downsample: Option<Downsample<B>>,
}

impl<B: Backend> BasicBlock<B> {
    fn new(in_channels: usize, out_channels: usize, stride: usize, device: &B::Device) -> Self {
        let downsample = (stride != 1 || in_channels != out_channels)
            .then(|| Downsample::new(in_channels, out_channels, stride, device));

        Self {
            conv1: conv3x3(in_channels, out_channels, stride, device),
            bn1: BatchNormConfig::new(out_channels).init(device),
            conv2: conv3x3(out_channels, out_channels, 1, device),
            bn2: BatchNormConfig::new(out_channels).init(device),
            downsample,
        }
    }

    fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 4> {
        let identity = match &self.downsample {
            Some(downsample) => downsample.forward(input.clone()),
            None => input.clone(),
        };

        let x = relu(self.bn1.forward(self.conv1.forward(input)));
        let x = self.bn2.forward(self.conv2.forward(x));

        relu(x + identity)
    }
}

fn stage<B: Backend>(
    in_channels: usize,
    out_channels: usize,
    stride: usize,
    device: &B::Device,
) -> Vec<BasicBlock<B>> {
    (0..BLOCKS_PER_STAGE)
        .map(|index| {
            if index == 0 {
                BasicBlock::new(in_channels, out_channels, stride, device)
            } else {
                BasicBlock::new(out_channels, out_channels, 1, device)
            }
        })
        .collect()
}

#[derive(Module, Debug)]
pub struct ResNet18<B: Backend> {
    conv1: Conv2d<B>,
    bn1: BatchNorm<B, 2>,
    maxpool: MaxPool2d,
    layer1: Vec<BasicBlock<B>>,
    layer2: Vec<BasicBlock<B>>,
    layer3: Vec<BasicBlock<B>>,
    layer4: Vec<BasicBlock<B>>,
    avgpool: AdaptiveAvgPool2d,
    fc: Linear<B>,
}

impl<B: Backend> ResNet18<B> {
    /// Randomly initialised network with a `num_classes`-way head.
    pub fn new(num_classes: usize, device: &B::Device) -> Self {
        let [c1, c2, c3, c4] = STAGE_CHANNELS;

        Self {
            conv1: Conv2dConfig::new([3, c1], [7, 7])
                .with_stride([2, 2])
                .with_padding(PaddingConfig2d::Explicit(3, 3))
                .with_bias(false)
                .init(device),
            bn1: BatchNormConfig::new(c1).init(device),
            maxpool: MaxPool2dConfig::new([3, 3])
                .with_strides([2, 2])
                .with_padding(PaddingConfig2d::Explicit(1, 1))
                .init(),
            layer1: stage(c1, c1, 1, device),
            layer2: stage(c1, c2, 2, device),
            layer3: stage(c2, c3, 2, device),
            layer4: stage(c3, c4, 2, device),
            avgpool: AdaptiveAvgPool2dConfig::new([1, 1]).init(),
            fc: LinearConfig::new(FEATURES, num_classes).init(device),
        }
    }

    /// Loads a torchvision `resnet18` checkpoint (1000-way ImageNet head).
    pub fn load_pretrained(path: &Path, device: &B::Device) -> Result<Self, TrainError> {
        let args = LoadArgs::new(path.to_path_buf())
            .with_key_remap(
                r"(layer[1-4])\.([0-9]+)\.downsample\.0\.(.+)",
                "$1.$2.downsample.conv.$3",
            )
            .with_key_remap(
                r"(layer[1-4])\.([0-9]+)\.downsample\.1\.(.+)",
                "$1.$2.downsample.bn.$3",
            );

        let record: ResNet18Record<B> = PyTorchFileRecorder::<FullPrecisionSettings>::default()
            .load(args, device)
            .map_err(TrainError::Weights)?;

        tracing::info!(path = %path.display(), "Pretrained weights loaded");
        Ok(Self::new(IMAGENET_CLASSES, device).load_record(record))
    }

    /// Swaps the head for a freshly initialised `num_classes`-way layer.
    pub fn with_num_classes(mut self, num_classes: usize, device: &B::Device) -> Self {
        self.fc = LinearConfig::new(FEATURES, num_classes).init(device);
        self
    }

    /// `[N, 3, H, W]` normalised images to `[N, num_classes]` logits.
    pub fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = relu(self.bn1.forward(self.conv1.forward(images)));
        let mut x = self.maxpool.forward(x);

        for block in self
            .layer1
            .iter()
            .chain(&self.layer2)
            .chain(&self.layer3)
            .chain(&self.layer4)
        {
            x = block.forward(x);
        }

        let x: Tensor<B, 2> = self.avgpool.forward(x).flatten(1, 3);
        self.fc.forward(x)
    }
}
