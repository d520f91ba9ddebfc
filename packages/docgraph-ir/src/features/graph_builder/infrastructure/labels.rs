//! Element → node label conversion
//!
//! Label families, in emission order:
//! - identifier: corpus-qualified element URI and plain name (`salt`)
//! - type information: element and annotation type (`<prefix>`)
//! - common attributes: class, id, confidence, n, href, datetime, processor
//!   (layer namespace)
//! - features and higher-order descriptions/comments (layer namespace)

use std::collections::BTreeMap;

use crate::shared::models::{ElementInfo, InlineAnnotation, Label, LabelKind};

/// Namespace of identifier and simplified labels
pub const NEUTRAL_NAMESPACE: &str = "salt";

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone)]
pub struct LabelConverter {
    prefix: String,
    corpus: String,
    document: String,
}

impl LabelConverter {
    pub fn new(
        prefix: impl Into<String>,
        corpus: impl Into<String>,
        document: impl Into<String>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            corpus: corpus.into(),
            document: document.into(),
        }
    }

    /// Corpus-qualified URI of an element of this document
    pub fn element_uri(&self, name: &str) -> String {
        format!("salt:/{}/{}#{}", self.corpus, self.document, name)
    }

    pub fn identifier(&self, id: Option<&str>) -> Vec<Label> {
        let Some(id) = id else {
            return Vec::new();
        };
        vec![
            Label::text(LabelKind::Identifier, Some(NEUTRAL_NAMESPACE), "id", self.element_uri(id)),
            Label::text(LabelKind::Identifier, Some(NEUTRAL_NAMESPACE), "name", id),
        ]
    }

    pub fn type_information(&self, element_type: &str, annotation_type: &str) -> Vec<Label> {
        vec![
            Label::text(LabelKind::MetaAnnotation, Some(self.prefix.as_str()), "elementtype", element_type),
            Label::text(
                LabelKind::MetaAnnotation,
                Some(self.prefix.as_str()),
                "annotationtype",
                annotation_type,
            ),
        ]
    }

    pub fn common_attributes(&self, info: &ElementInfo, namespace: &str) -> Vec<Label> {
        let ns = Some(namespace);
        let mut labels = Vec::new();

        if let Some(class) = &info.class {
            labels.push(Label::text(LabelKind::Annotation, ns, "class", class));
        }
        if let Some(id) = &info.id {
            labels.push(Label::text(LabelKind::MetaAnnotation, ns, "id", id));
        }
        if let Some(confidence) = info.confidence {
            labels.push(Label::float(LabelKind::MetaAnnotation, ns, "confidence", confidence));
        }
        if let Some(n) = &info.n {
            labels.push(Label::text(LabelKind::MetaAnnotation, ns, "n", n));
        }
        if let Some(href) = &info.href {
            labels.push(Label::text(LabelKind::MetaAnnotation, ns, "href", href));
        }
        if let Some(datetime) = &info.datetime {
            labels.push(Label::text(
                LabelKind::MetaAnnotation,
                ns,
                "datetime",
                datetime.format(DATETIME_FORMAT).to_string(),
            ));
        }
        if let Some(processor) = &info.processor {
            labels.push(Label::text(LabelKind::MetaAnnotation, ns, "processor/id", &processor.id));
            labels.push(Label::text(LabelKind::MetaAnnotation, ns, "processor/name", &processor.name));
            labels.push(Label::text(
                LabelKind::MetaAnnotation,
                ns,
                "processor/type",
                &processor.processor_type,
            ));
        }
        labels
    }

    pub fn features(&self, info: &ElementInfo, namespace: &str) -> Vec<Label> {
        info.features
            .iter()
            .map(|feature| {
                Label::text(
                    LabelKind::Annotation,
                    Some(namespace),
                    format!("feature/{}", feature.subset),
                    &feature.class,
                )
            })
            .collect()
    }

    /// Descriptions and comments, numbered from 1
    pub fn higher_order(&self, info: &ElementInfo, namespace: &str) -> Vec<Label> {
        let descriptions = info.descriptions.iter().enumerate().map(|(i, value)| {
            Label::text(
                LabelKind::MetaAnnotation,
                Some(namespace),
                format!("description/{}", i + 1),
                value,
            )
        });
        let comments = info.comments.iter().enumerate().map(|(i, value)| {
            Label::text(
                LabelKind::MetaAnnotation,
                Some(namespace),
                format!("comment/{}", i + 1),
                value,
            )
        });
        descriptions.chain(comments).collect()
    }

    /// Full label set of a node created for an element
    pub fn element(
        &self,
        info: &ElementInfo,
        element_type: &str,
        annotation_type: &str,
        namespace: &str,
    ) -> Vec<Label> {
        let mut labels = self.identifier(info.id());
        labels.extend(self.type_information(element_type, annotation_type));
        labels.extend(self.common_attributes(info, namespace));
        labels.extend(self.features(info, namespace));
        labels.extend(self.higher_order(info, namespace));
        labels
    }

    /// Labels an inline annotation contributes to its token
    pub fn inline(&self, annotation: &InlineAnnotation, namespace: &str) -> Vec<Label> {
        let mut labels = self.common_attributes(&annotation.info, namespace);
        labels.extend(self.features(&annotation.info, namespace));
        labels.extend(self.higher_order(&annotation.info, namespace));
        labels
    }

    /// Class label in the neutral namespace, named after the element type
    pub fn simplified(&self, annotation: &InlineAnnotation) -> Option<Label> {
        let class = annotation.info.class.as_ref()?;
        let name = annotation
            .element_type
            .as_deref()
            .unwrap_or(&annotation.annotation_type);
        Some(Label::text(LabelKind::Annotation, Some(NEUTRAL_NAMESPACE), name, class))
    }

    /// Document metadata as graph labels
    pub fn metadata(&self, metadata: &BTreeMap<String, String>) -> Vec<Label> {
        let namespace = format!("{}::meta", self.prefix);
        metadata
            .iter()
            .map(|(key, value)| Label::text(LabelKind::MetaAnnotation, Some(namespace.as_str()), key, value))
            .collect()
    }

    /// Identifier label of an edge
    pub fn edge_name(&self, name: String) -> Label {
        Label::text(LabelKind::Identifier, Some(NEUTRAL_NAMESPACE), "name", name)
    }
}
