//! Test data builders

use docgraph_ir::shared::models::{
    AnnotationLayer, Document, NestedLayer, NestedNode, SpanAnnotation, SpanLayer, Structure,
    Token,
};

/// One sentence per inner slice, tokens `w1..wn` numbered across the document
pub fn document_from_sentences(id: &str, sentences: &[&[&str]]) -> Document {
    let mut doc = Document::new(id);
    let mut paragraph = Structure::new("paragraph", Some("p1"));
    let mut counter = 0;

    for (i, words) in sentences.iter().enumerate() {
        let mut sentence = Structure::new("sentence", Some(format!("s{}", i + 1).as_str()));
        for word in words.iter() {
            counter += 1;
            sentence = sentence.with_token(Token::new(format!("w{}", counter), *word));
        }
        paragraph = paragraph.with_structure(sentence);
    }

    doc.body.push(paragraph);
    doc
}

/// `The cat sat` in a single sentence (no enclosing paragraph)
pub fn the_cat_sat() -> Document {
    let mut doc = Document::new("doc1");
    doc.body.push(
        Structure::new("sentence", Some("s1"))
            .with_token(Token::new("w1", "The"))
            .with_token(Token::new("w2", "cat"))
            .with_token(Token::new("w3", "sat")),
    );
    doc
}

/// Builder for span layers
#[derive(Debug)]
pub struct SpanLayerBuilder {
    layer: SpanLayer,
}

impl SpanLayerBuilder {
    pub fn new(annotation_type: &str, set: Option<&str>) -> Self {
        Self {
            layer: SpanLayer {
                annotation_type: annotation_type.to_string(),
                set: set.map(str::to_string),
                spans: Vec::new(),
            },
        }
    }

    pub fn span(mut self, id: Option<&str>, class: &str, wrefs: &[&str]) -> Self {
        let mut span = SpanAnnotation::new(id, wrefs);
        span.info.class = Some(class.to_string());
        self.layer.spans.push(span);
        self
    }

    pub fn with(mut self, span: SpanAnnotation) -> Self {
        self.layer.spans.push(span);
        self
    }

    pub fn build(self) -> AnnotationLayer {
        AnnotationLayer::Span(self.layer)
    }
}

/// Single-root nested layer
pub fn nested_layer(annotation_type: &str, root: NestedNode) -> AnnotationLayer {
    AnnotationLayer::Nested(NestedLayer {
        annotation_type: annotation_type.to_string(),
        set: None,
        roots: vec![root],
    })
}

/// `Top(NP(w1, w2), VP(w3))`
pub fn top_np_vp() -> NestedNode {
    NestedNode::new(Some("top"), "Top")
        .with_node(NestedNode::new(Some("np"), "NP").with_token("w1").with_token("w2"))
        .with_node(NestedNode::new(Some("vp"), "VP").with_token("w3"))
}
